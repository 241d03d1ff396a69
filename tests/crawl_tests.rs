//! Integration tests for the crawl coordinator
//!
//! These run the full crawl loop against wiremock servers, with stub
//! renderers and OCR engines substituted at the component seams.

use async_trait::async_trait;
use pagesift::config::{Config, CrawlConfig, OutputConfig};
use pagesift::crawler::{build_http_client, Coordinator, PageRenderer, StopReason};
use pagesift::ocr::{ImageTextService, OcrEngine};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(seed: &str, max_pages: u32, retries: u32) -> Config {
    Config {
        crawl: CrawlConfig {
            seed_url: seed.to_string(),
            max_pages,
            retries,
            workers: 5,
            proxy: None,
        },
        output: OutputConfig {
            document_path: "./out/summary.md".to_string(),
            tabular_prefix: "./out/extract".to_string(),
        },
        llm: None,
        ocr: None,
    }
}

/// Renderer that must never be reached (every test page is static-usable)
struct UnreachableRenderer;

#[async_trait]
impl PageRenderer for UnreachableRenderer {
    async fn render(&self, url: &str) -> anyhow::Result<String> {
        panic!("render fallback must not be used for {url}");
    }
}

/// Renderer that always fails, so fetch attempts burn out
struct FailingRenderer;

#[async_trait]
impl PageRenderer for FailingRenderer {
    async fn render(&self, url: &str) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("browser crashed rendering {url}"))
    }
}

/// Engine returning fixed text for any image
struct FixedEngine;

#[async_trait]
impl OcrEngine for FixedEngine {
    async fn recognize(&self, _image: &[u8]) -> anyhow::Result<String> {
        // Untrimmed on purpose; the service is expected to trim.
        Ok(" recognized text \n".to_string())
    }
}

fn coordinator(config: Config, renderer: Arc<dyn PageRenderer>) -> Coordinator {
    let client = build_http_client(&config.crawl).unwrap();
    let images = Arc::new(ImageTextService::new(
        reqwest::Client::new(),
        Arc::new(FixedEngine),
    ));
    Coordinator::with_components(config, client, renderer, images)
}

#[tokio::test]
async fn test_end_to_end_two_page_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    let page1 = format!(
        r#"<html><body>
        <p>First paragraph with enough descriptive words to pass the heuristic.</p>
        <p>Second paragraph, also carrying a sensible amount of text content.</p>
        <table>
          <tr><th>Name</th><th>Qty</th></tr>
          <tr><td>Bolt</td><td>7</td></tr>
        </table>
        <img src="{base}/images/part.png">
        <a href="{base}/page2">Next</a>
        </body></html>"#
    );
    let page2 = format!(
        r#"<html><body>
        <p>The second page closes the chain with one more block of text.</p>
        <a href="{base}/docs">Documentation</a>
        </body></html>"#
    );

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page1))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page2))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images/part.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]))
        .mount(&server)
        .await;

    let config = test_config(&format!("{base}/page1"), 5, 3);
    let report = coordinator(config, Arc::new(UnreachableRenderer))
        .scrape_all_pages()
        .await
        .unwrap();

    // Two pages visited; the crawl ended because page 2 has no next link,
    // not because the budget ran out.
    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.stop, StopReason::NoNextLink);

    let aggregate = report.aggregate;
    assert_eq!(aggregate.texts.len(), 3);
    assert!(aggregate.texts[0].starts_with("First paragraph"));
    assert!(aggregate.texts[2].starts_with("The second page"));

    assert_eq!(aggregate.tables.len(), 1);
    assert_eq!(aggregate.tables[0].rows.len(), 2);
    assert_eq!(aggregate.tables[0].rows[1], vec!["Bolt", "7"]);

    assert_eq!(aggregate.image_texts, vec!["recognized text"]);

    let urls: Vec<String> = aggregate.links.iter().map(|l| l.url.clone()).collect();
    assert_eq!(urls, vec![format!("{base}/page2"), format!("{base}/docs")]);
}

#[tokio::test]
async fn test_page_limit_bounds_endless_chain() {
    let server = MockServer::start().await;
    let base = server.uri();

    // The page links to itself, so the chain never ends on its own. The
    // mock's expect() verifies exactly three fetches happened.
    let page = format!(
        r#"<html><body>
        <p>A page that always advertises more content behind a next link.</p>
        <a href="{base}/loop">Next &gt;</a>
        </body></html>"#
    );

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(3)
        .mount(&server)
        .await;

    let config = test_config(&format!("{base}/loop"), 3, 3);
    let report = coordinator(config, Arc::new(UnreachableRenderer))
        .scrape_all_pages()
        .await
        .unwrap();

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.stop, StopReason::PageLimit);
    assert_eq!(report.aggregate.texts.len(), 3);
}

#[tokio::test]
async fn test_unavailable_page_keeps_prior_aggregate() {
    let server = MockServer::start().await;
    let base = server.uri();

    let page1 = format!(
        r#"<html><body>
        <p>Content collected before the crawl runs into the broken page.</p>
        <a href="{base}/missing">Next</a>
        </body></html>"#
    );

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page1))
        .mount(&server)
        .await;
    // Short error body: fails the usability heuristic, and the renderer
    // fails too, so every attempt burns out.
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(500).set_body_string("err"))
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(&format!("{base}/page1"), 5, 2);
    let report = coordinator(config, Arc::new(FailingRenderer))
        .scrape_all_pages()
        .await
        .unwrap();

    assert_eq!(report.stop, StopReason::PageUnavailable);
    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.aggregate.texts.len(), 1);
    assert!(report.aggregate.texts[0].starts_with("Content collected"));
}

#[tokio::test]
async fn test_image_results_align_with_input_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    let page = format!(
        r#"<html><body>
        <p>A page with one healthy image and one that cannot be fetched.</p>
        <img src="{base}/good.png">
        <img src="{base}/bad.png">
        </body></html>"#
    );

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/good.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bad.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = test_config(&format!("{base}/page"), 1, 3);
    let report = coordinator(config, Arc::new(UnreachableRenderer))
        .scrape_all_pages()
        .await
        .unwrap();

    // Failed entries stay in place as empty strings; results align
    // index-for-index with the image URLs on the page.
    assert_eq!(report.aggregate.image_texts, vec!["recognized text", ""]);
}
