//! Page fetcher with static/rendered fallback and retry logic
//!
//! Every page goes through a two-stage strategy:
//!
//! 1. A plain HTTP GET. If the document passes the usability heuristic
//!    (enough visible text, no "Loading" placeholder), it is returned as-is.
//! 2. Otherwise a headless browser renders the page and the post-script
//!    markup is returned instead.
//!
//! Any failure in either stage counts as one attempt; attempts are retried
//! with a fixed delay until the configured budget is exhausted, at which
//! point the page is reported unavailable and the crawl loop ends.

use crate::config::CrawlConfig;
use crate::crawler::render::PageRenderer;
use crate::SiftError;
use reqwest::Client;
use scraper::{ElementRef, Html, Node};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Request timeout for static page fetches
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Fixed delay between fetch attempts
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Browser-like user agent presented on all page requests
const USER_AGENT: &str = "Mozilla/5.0";

/// Minimum visible-text length for a static document to count as usable
const MIN_VISIBLE_TEXT: usize = 50;

/// Which stage produced a fetched document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Plain HTTP transfer, scripts not executed
    Static,

    /// Headless browser render, post-script DOM
    Rendered,
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,

    /// Raw markup, from the wire or from the rendered DOM
    pub html: String,

    /// The stage that produced the markup
    pub strategy: FetchStrategy,
}

/// Transient retry state for one URL
///
/// Created per fetch, discarded after success or exhaustion.
#[derive(Debug)]
struct FetchAttempt {
    made: u32,
    budget: u32,
    last_error: Option<String>,
}

impl FetchAttempt {
    fn new(budget: u32) -> Self {
        Self {
            made: 0,
            budget,
            last_error: None,
        }
    }

    fn record(&mut self, error: &anyhow::Error) {
        self.made += 1;
        self.last_error = Some(error.to_string());
    }

    fn exhausted(&self) -> bool {
        self.made >= self.budget
    }
}

/// Builds the HTTP client used for page fetches
///
/// Certificate verification is disabled on purpose: the tool is pointed at
/// scraping targets with broken or self-signed chains, and a failed
/// handshake would otherwise be indistinguishable from a dead site. This is
/// a trust-all policy, not an oversight.
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, SiftError> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}

/// Fetches one page, retrying with a fixed delay on any failure
///
/// Returns `SiftError::PageUnavailable` once `retries` attempts have been
/// spent; the caller must treat that as terminal for the crawl loop.
pub async fn fetch_page(
    client: &Client,
    renderer: &dyn PageRenderer,
    url: &str,
    retries: u32,
) -> Result<FetchedPage, SiftError> {
    let mut attempt = FetchAttempt::new(retries);

    loop {
        match fetch_once(client, renderer, url).await {
            Ok(page) => {
                debug!(
                    "fetched {} via {:?} ({} bytes)",
                    url,
                    page.strategy,
                    page.html.len()
                );
                return Ok(page);
            }
            Err(e) => {
                attempt.record(&e);
                warn!(
                    "page fetch failed (attempt {}/{}): {} -> {}",
                    attempt.made, attempt.budget, url, e
                );
                if attempt.exhausted() {
                    error!(
                        "failed to fetch page after {} attempts: {} (last error: {})",
                        retries,
                        url,
                        attempt.last_error.as_deref().unwrap_or("unknown")
                    );
                    return Err(SiftError::PageUnavailable {
                        url: url.to_string(),
                        attempts: retries,
                    });
                }
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}

/// One fetch attempt: static GET, then the render fallback if needed
async fn fetch_once(
    client: &Client,
    renderer: &dyn PageRenderer,
    url: &str,
) -> anyhow::Result<FetchedPage> {
    let response = client.get(url).send().await?;
    // reqwest decodes the body with the charset declared by the response.
    let body = response.text().await?;

    if static_document_usable(&body) {
        return Ok(FetchedPage {
            url: url.to_string(),
            html: body,
            strategy: FetchStrategy::Static,
        });
    }

    debug!("static document unusable, rendering in headless browser: {url}");
    let rendered = renderer.render(url).await?;

    Ok(FetchedPage {
        url: url.to_string(),
        html: rendered,
        strategy: FetchStrategy::Rendered,
    })
}

/// Usability heuristic for a statically fetched document
///
/// A document is usable when its visible text (scripts and styles stripped)
/// is longer than 50 characters and does not contain the literal substring
/// "Loading", the marker left behind by client-rendered shells.
pub fn static_document_usable(html: &str) -> bool {
    let document = Html::parse_document(html);
    let text = visible_text(&document);
    text.chars().count() > MIN_VISIBLE_TEXT && !text.contains("Loading")
}

/// Collects the visible text of a document, skipping script and style trees
pub fn visible_text(document: &Html) -> String {
    let mut buf = String::new();
    collect_visible(document.root_element(), &mut buf);
    buf
}

fn collect_visible(element: ElementRef<'_>, buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    buf.push_str(trimmed);
                }
            }
            Node::Element(el) => {
                if matches!(el.name(), "script" | "style") {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_visible(child_ref, buf);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_document_not_usable() {
        let html = "<html><body><p>Hi</p></body></html>";
        assert!(!static_document_usable(html));
    }

    #[test]
    fn test_long_document_usable() {
        let html = format!("<html><body><p>{}</p></body></html>", "word ".repeat(20));
        assert!(static_document_usable(&html));
    }

    #[test]
    fn test_loading_marker_forces_fallback() {
        let html = format!(
            "<html><body><p>Loading</p><p>{}</p></body></html>",
            "word ".repeat(20)
        );
        assert!(!static_document_usable(&html));
    }

    #[test]
    fn test_script_text_does_not_count_as_visible() {
        // A client-rendered shell: plenty of script source, no real content.
        let html = format!(
            "<html><head><script>{}</script></head><body><p>Hi</p></body></html>",
            "var x = 1; ".repeat(30)
        );
        assert!(!static_document_usable(&html));
    }

    #[test]
    fn test_style_text_does_not_count_as_visible() {
        let html = format!(
            "<html><head><style>{}</style></head><body></body></html>",
            ".c {{ color: red; }} ".repeat(20)
        );
        assert!(!static_document_usable(&html));
    }

    #[test]
    fn test_visible_text_concatenates_trimmed_nodes() {
        let document = Html::parse_document(
            "<html><body><p> hello </p><script>ignored()</script><p>world</p></body></html>",
        );
        assert_eq!(visible_text(&document), "helloworld");
    }

    #[test]
    fn test_fetch_attempt_exhaustion() {
        let mut attempt = FetchAttempt::new(3);
        let error = anyhow::anyhow!("connection refused");

        attempt.record(&error);
        assert!(!attempt.exhausted());
        attempt.record(&error);
        assert!(!attempt.exhausted());
        attempt.record(&error);
        assert!(attempt.exhausted());
        assert_eq!(attempt.last_error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_build_http_client() {
        let config = CrawlConfig {
            seed_url: "https://example.com/".to_string(),
            max_pages: 5,
            retries: 3,
            workers: 5,
            proxy: None,
        };
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_build_http_client_rejects_bad_proxy() {
        let config = CrawlConfig {
            seed_url: "https://example.com/".to_string(),
            max_pages: 5,
            retries: 3,
            workers: 5,
            proxy: Some("::not a proxy::".to_string()),
        };
        assert!(build_http_client(&config).is_err());
    }
}
