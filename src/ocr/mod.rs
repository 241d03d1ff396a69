//! Image text extraction
//!
//! Bridges image URLs found during extraction to an OCR engine. The service
//! never fails outward: any problem (unfetchable image, engine error,
//! missing configuration) degrades to an empty string and a warning, so a
//! broken image can never take a crawl down.

use crate::config::OcrConfig;
use crate::SiftError;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Timeout for image downloads
const IMAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Recognition seam: image bytes in, text out
///
/// The shipped engine posts bytes to an HTTP OCR endpoint; tests substitute
/// fixed-output stubs.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> anyhow::Result<String>;
}

/// Engine that posts raw image bytes to an HTTP OCR endpoint
///
/// The endpoint is expected to answer with the recognized text as the plain
/// response body.
pub struct HttpOcrEngine {
    client: Client,
    endpoint: String,
}

impl HttpOcrEngine {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for HttpOcrEngine {
    async fn recognize(&self, image: &[u8]) -> anyhow::Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Placeholder engine used when no `[ocr]` section is configured
struct DisabledOcrEngine;

#[async_trait]
impl OcrEngine for DisabledOcrEngine {
    async fn recognize(&self, _image: &[u8]) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("no OCR endpoint configured"))
    }
}

/// Fetches images and runs them through the OCR engine
pub struct ImageTextService {
    client: Client,
    engine: Arc<dyn OcrEngine>,
}

impl ImageTextService {
    pub fn new(client: Client, engine: Arc<dyn OcrEngine>) -> Self {
        Self { client, engine }
    }

    /// Builds the service from configuration
    ///
    /// Image fetches use their own client: shorter timeout than page
    /// fetches, same lenient TLS policy.
    pub fn from_config(config: Option<&OcrConfig>) -> Result<Self, SiftError> {
        let client = Client::builder()
            .timeout(IMAGE_FETCH_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .build()?;

        let engine: Arc<dyn OcrEngine> = match config {
            Some(ocr) => Arc::new(HttpOcrEngine::new(client.clone(), ocr.endpoint.clone())),
            None => Arc::new(DisabledOcrEngine),
        };

        Ok(Self::new(client, engine))
    }

    /// Returns the recognized text of an image, or empty string on failure
    pub async fn extract_text(&self, raw_url: &str) -> String {
        match self.try_extract(raw_url).await {
            Ok(text) => text,
            Err(e) => {
                warn!("image could not be processed: {} -> {}", raw_url, e);
                String::new()
            }
        }
    }

    async fn try_extract(&self, raw_url: &str) -> anyhow::Result<String> {
        let url = normalize_image_url(raw_url);
        let bytes = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let text = self.engine.recognize(&bytes).await?;
        Ok(text.trim().to_string())
    }
}

/// Prefixes schemeless image URLs with `https:`
///
/// The intended case is protocol-relative `//host/path` sources; anything
/// else that lacks a scheme gets the same prefix and will simply fail to
/// fetch, which the service reports as empty text.
pub fn normalize_image_url(raw: &str) -> String {
    if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https:{raw}")
    }
}
