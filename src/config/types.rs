use serde::Deserialize;

/// Main configuration structure for Pagesift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub llm: Option<LlmConfig>,
    #[serde(default)]
    pub ocr: Option<OcrConfig>,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Absolute http/https URL to start crawling from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of pages to visit in one run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Total fetch attempts per page before giving up
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Width of the per-page image OCR worker pool
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Optional proxy URL applied to all page and image requests
    #[serde(default)]
    pub proxy: Option<String>,
}

/// Output file configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the generated text document
    #[serde(rename = "document-path")]
    pub document_path: String,

    /// Prefix for tabular outputs; tables land at `{prefix}_table{N}.csv`
    /// and links at `{prefix}_links.csv`
    #[serde(rename = "tabular-prefix")]
    pub tabular_prefix: String,
}

/// Language-model summarization configuration
///
/// Omitting the whole `[llm]` section disables summarization; extracted
/// text is then persisted as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Model identifier sent to the chat-completions endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,

    /// Endpoint base URL, overridable for proxies and tests
    #[serde(rename = "base-url", default)]
    pub base_url: Option<String>,

    /// Maximum characters per summarization chunk
    #[serde(rename = "max-chunk-chars", default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
}

/// OCR engine configuration
///
/// Omitting the `[ocr]` section leaves image text extraction disabled;
/// every image then yields an empty string.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// HTTP endpoint that accepts raw image bytes and returns recognized text
    pub endpoint: String,
}

fn default_max_pages() -> u32 {
    5
}

fn default_retries() -> u32 {
    3
}

fn default_workers() -> usize {
    5
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_chunk_chars() -> usize {
    2000
}
