use crate::config::types::{Config, CrawlConfig, LlmConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Runs before any network or file activity so a bad configuration is
/// rejected synchronously with a user-facing message.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    if let Some(llm) = &config.llm {
        validate_llm_config(llm)?;
    }
    if let Some(ocr) = &config.ocr {
        validate_endpoint(&ocr.endpoint)?;
    }
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.seed_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seed_url cannot be empty".to_string(),
        ));
    }

    // Only scheme and absoluteness are checked up front; any other malformed
    // URL surfaces later as a fetch failure.
    let url = Url::parse(&config.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed_url: {}", e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "seed_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.retries < 1 {
        return Err(ConfigError::Validation(format!(
            "retries must be >= 1, got {}",
            config.retries
        )));
    }

    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if let Some(proxy) = &config.proxy {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy URL '{}': {}", proxy, e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.document_path.is_empty() {
        return Err(ConfigError::Validation(
            "document_path cannot be empty".to_string(),
        ));
    }

    if config.tabular_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "tabular_prefix cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates language-model configuration
fn validate_llm_config(config: &LlmConfig) -> Result<(), ConfigError> {
    if config.model.is_empty() {
        return Err(ConfigError::Validation(
            "llm model cannot be empty".to_string(),
        ));
    }

    if config.max_chunk_chars < 1 {
        return Err(ConfigError::Validation(format!(
            "max_chunk_chars must be >= 1, got {}",
            config.max_chunk_chars
        )));
    }

    if let Some(base_url) = &config.base_url {
        validate_endpoint(base_url)?;
    }

    // Key may also arrive via the environment, so its absence here is not an
    // error; the summarizer constructor performs the final check.
    Ok(())
}

/// Validates that an endpoint string is an absolute http/https URL
fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint '{}': {}", endpoint, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Endpoint '{}' must use http or https",
            endpoint
        )));
    }
    Ok(())
}
