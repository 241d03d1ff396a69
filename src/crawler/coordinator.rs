//! Crawl coordinator - the main page loop
//!
//! Drives one crawl run: fetch a page, extract its content, fan the page's
//! image URLs out to the OCR service, fold everything into the aggregate,
//! then follow the pagination link. Pages are processed strictly
//! sequentially; image text extraction is the only intra-page parallelism.

use crate::config::Config;
use crate::crawler::extractor::extract_content;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::pagination::next_page_url;
use crate::crawler::render::{HeadlessRenderer, PageRenderer};
use crate::crawler::CrawlAggregate;
use crate::ocr::ImageTextService;
use crate::SiftError;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::Html;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use url::Url;

/// Why a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No pagination link was found on the last page
    NoNextLink,

    /// The configured page budget was spent
    PageLimit,

    /// A page stayed unreachable through every retry; the run kept what it
    /// had aggregated so far
    PageUnavailable,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoNextLink => write!(f, "no next link"),
            Self::PageLimit => write!(f, "page limit reached"),
            Self::PageUnavailable => write!(f, "page unavailable"),
        }
    }
}

/// Result of one crawl run
#[derive(Debug)]
pub struct CrawlReport {
    pub aggregate: CrawlAggregate,
    pub pages_visited: u32,
    pub stop: StopReason,
}

/// Main crawl coordinator
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    renderer: Arc<dyn PageRenderer>,
    images: Arc<ImageTextService>,
}

impl Coordinator {
    /// Creates a coordinator with the default production components
    pub fn new(config: Config) -> Result<Self, SiftError> {
        let client = build_http_client(&config.crawl)?;
        let images = Arc::new(ImageTextService::from_config(config.ocr.as_ref())?);
        Ok(Self::with_components(
            config,
            client,
            Arc::new(HeadlessRenderer::new()),
            images,
        ))
    }

    /// Creates a coordinator from pre-built components
    ///
    /// Used by tests to substitute the renderer and OCR engine.
    pub fn with_components(
        config: Config,
        client: Client,
        renderer: Arc<dyn PageRenderer>,
        images: Arc<ImageTextService>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            client,
            renderer,
            images,
        }
    }

    /// Walks the pagination chain and aggregates extracted content
    ///
    /// The loop ends when the next link disappears, the page budget is
    /// spent, or a page stays unavailable through every retry. The last
    /// case is not an error: whatever was aggregated before the failure is
    /// returned with the report.
    pub async fn scrape_all_pages(&self) -> Result<CrawlReport, SiftError> {
        let max_pages = self.config.crawl.max_pages;
        let retries = self.config.crawl.retries;

        let mut aggregate = CrawlAggregate::default();
        let mut pages_visited: u32 = 0;
        let mut current = Some(Url::parse(&self.config.crawl.seed_url)?);
        let started = Instant::now();

        info!(
            "starting crawl at {} (max {} pages)",
            self.config.crawl.seed_url, max_pages
        );

        let stop = loop {
            let Some(page_url) = current.take() else {
                break StopReason::NoNextLink;
            };
            if pages_visited >= max_pages {
                break StopReason::PageLimit;
            }

            let fetched = match fetch_page(
                &self.client,
                self.renderer.as_ref(),
                page_url.as_str(),
                retries,
            )
            .await
            {
                Ok(fetched) => fetched,
                Err(SiftError::PageUnavailable { url, attempts }) => {
                    warn!(
                        "could not fetch {url} after {attempts} attempts; \
                         stopping with partial results"
                    );
                    break StopReason::PageUnavailable;
                }
                Err(e) => return Err(e),
            };

            // Parsed markup lives only for this extraction pass.
            let (mut content, next) = {
                let document = Html::parse_document(&fetched.html);
                let content = extract_content(&document);
                let next = next_page_url(&document, &page_url);
                (content, next)
            };

            let image_urls = std::mem::take(&mut content.image_urls);
            let image_texts = self.dispatch_images(image_urls).await;

            pages_visited += 1;
            info!(
                "page {} ({}): {} text blocks, {} links, {} tables, {} images",
                pages_visited,
                page_url,
                content.texts.len(),
                content.links.len(),
                content.tables.len(),
                image_texts.len()
            );

            aggregate.absorb(content, image_texts);
            current = next;
        };

        info!(
            "crawl finished after {} pages in {:.1?} ({})",
            pages_visited,
            started.elapsed(),
            stop
        );

        Ok(CrawlReport {
            aggregate,
            pages_visited,
            stop,
        })
    }

    /// Runs this page's image URLs through the OCR service
    ///
    /// A fixed-width pool (`workers`) processes URLs concurrently; results
    /// come back aligned index-for-index with the input regardless of
    /// completion order, failures included as empty strings.
    async fn dispatch_images(&self, image_urls: Vec<String>) -> Vec<String> {
        let workers = self.config.crawl.workers.max(1);

        stream::iter(image_urls)
            .map(|url| {
                let images = Arc::clone(&self.images);
                async move { images.extract_text(&url).await }
            })
            .buffered(workers)
            .collect()
            .await
    }
}

/// Runs a complete crawl with default components
pub async fn run_crawl(config: Config) -> Result<CrawlReport, SiftError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.scrape_all_pages().await
}

/// Spawns a crawl on its own task
///
/// A long crawl never blocks the caller's loop; completion is observed
/// through the returned handle.
pub fn spawn_crawl(config: Config) -> JoinHandle<Result<CrawlReport, SiftError>> {
    tokio::spawn(run_crawl(config))
}
