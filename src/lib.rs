//! Pagesift: a paginated crawl-and-extract pipeline
//!
//! This crate crawls a chain of paginated web pages starting from a seed URL,
//! extracts structured content (text blocks, links, tables, image text via
//! OCR), optionally summarizes the text through a language-model call, and
//! persists the results to document and tabular files.

pub mod config;
pub mod crawler;
pub mod ocr;
pub mod output;
pub mod summarize;

use thiserror::Error;

/// Main error type for Pagesift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page unavailable after {attempts} attempts: {url}")]
    PageUnavailable { url: String, attempts: u32 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Language model error: {0}")]
    Llm(#[from] summarize::LlmError),

    #[error("Crawl task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Pagesift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlAggregate, CrawlReport, PageContent, StopReason};
