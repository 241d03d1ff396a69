//! Crawler module for paginated page fetching and content extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a headless-render fallback and retry logic
//! - Content extraction (text blocks, links, tables, image URLs)
//! - Next-page discovery from pagination links
//! - Overall crawl coordination and result aggregation

mod coordinator;
mod extractor;
mod fetcher;
mod pagination;
mod render;

pub use coordinator::{run_crawl, spawn_crawl, Coordinator, CrawlReport, StopReason};
pub use extractor::{
    extract_content, extract_image_urls, extract_links, extract_tables, extract_text_blocks,
};
pub use fetcher::{
    build_http_client, fetch_page, static_document_usable, visible_text, FetchStrategy,
    FetchedPage,
};
pub use pagination::next_page_url;
pub use render::{HeadlessRenderer, PageRenderer};

use crate::config::Config;
use crate::SiftError;

/// An outbound link with the anchor text it was presented under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Trimmed visible text of the anchor
    pub label: String,

    /// Absolute URL from the href attribute
    pub url: String,
}

/// A table extracted from a page: rows of trimmed cell strings
///
/// Rows with only empty cells are dropped at extraction time, and a table
/// with no surviving rows is dropped entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

/// Everything extracted from one page, in document order
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Trimmed text of every paragraph and heading element
    pub texts: Vec<String>,

    /// Outbound links whose href starts with `http`
    pub links: Vec<Link>,

    /// Tables surviving the emptiness filter
    pub tables: Vec<Table>,

    /// Raw `src` values of every image element, unfiltered
    pub image_urls: Vec<String>,
}

/// Accumulated results across all visited pages
///
/// Grows in visit order, then intra-page order; never shrinks during a run.
/// Image text entries align one-to-one with the image URLs of each page,
/// failed recognitions included as empty strings.
#[derive(Debug, Clone, Default)]
pub struct CrawlAggregate {
    pub texts: Vec<String>,
    pub links: Vec<Link>,
    pub tables: Vec<Table>,
    pub image_texts: Vec<String>,
}

impl CrawlAggregate {
    /// Merges one page's extraction output and its image text results
    pub fn absorb(&mut self, content: PageContent, image_texts: Vec<String>) {
        self.texts.extend(content.texts);
        self.links.extend(content.links);
        self.tables.extend(content.tables);
        self.image_texts.extend(image_texts);
    }

    /// Returns true if nothing was collected
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
            && self.links.is_empty()
            && self.tables.is_empty()
            && self.image_texts.is_empty()
    }
}

/// Runs a complete crawl with the default components
///
/// Builds the HTTP client, headless renderer, and image text service from
/// the configuration, then walks the pagination chain until the next link
/// disappears, the page limit is reached, or a page becomes unavailable.
pub async fn crawl(config: Config) -> Result<CrawlReport, SiftError> {
    run_crawl(config).await
}
