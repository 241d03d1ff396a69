//! Headless browser rendering for script-built pages
//!
//! Pages that fail the static usability heuristic are handed to a headless
//! Chromium session: navigate, wait for a `body` element to exist, capture
//! the post-script DOM, tear the session down. Each render launches its own
//! browser so a wedged page cannot poison later fetches.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, warn};

/// Viewport used for rendered fetches
const WINDOW_WIDTH: u32 = 1920;
const WINDOW_HEIGHT: u32 = 1080;

/// How long to wait for a `body` element after navigation
const BODY_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll interval while waiting for the body element
const BODY_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Rendering seam for the fetcher
///
/// The production implementation drives a headless Chromium; tests swap in
/// stubs to exercise the fallback decision without a browser.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigates to `url` and returns the fully rendered markup
    async fn render(&self, url: &str) -> anyhow::Result<String>;
}

/// Chromium-backed renderer
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    _private: (),
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    async fn capture(browser: &Browser, url: &str) -> anyhow::Result<String> {
        let page = browser.new_page(url).await?;

        // The page is considered renderable once a body element exists;
        // anything slower than the wait budget is treated as a failed attempt.
        let body_wait = async {
            loop {
                if page.find_element("body").await.is_ok() {
                    break;
                }
                tokio::time::sleep(BODY_POLL_INTERVAL).await;
            }
        };
        tokio::time::timeout(BODY_WAIT_TIMEOUT, body_wait)
            .await
            .map_err(|_| anyhow::anyhow!("no body element after {:?}: {}", BODY_WAIT_TIMEOUT, url))?;

        let html = page.content().await?;
        if let Err(e) = page.close().await {
            warn!("failed to close rendered page for {}: {}", url, e);
        }

        Ok(html)
    }
}

#[async_trait]
impl PageRenderer for HeadlessRenderer {
    async fn render(&self, url: &str) -> anyhow::Result<String> {
        debug!("launching headless browser for {url}");

        let config = BrowserConfig::builder()
            .window_size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .build()
            .map_err(|e| anyhow::anyhow!("browser config: {e}"))?;

        let (mut browser, mut handler) = Browser::launch(config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = Self::capture(&browser, url).await;

        // Teardown happens on every path, success or not; the browser
        // process must never outlive the render call.
        if let Err(e) = browser.close().await {
            warn!("failed to close headless browser: {e}");
        }
        let _ = browser.wait().await;
        handler_task.abort();

        result
    }
}
