//! Next-page discovery from pagination links
//!
//! The match is substring-based and case-sensitive: the first anchor whose
//! visible text contains "Next" or ">" wins. That is loose on purpose: it
//! can false-positive on words like "Nexted" or a stray ">" in prose, but
//! tightening it would break crawls against sites the heuristic currently
//! handles. Treat any change here as a behavior change, not a cleanup.

use scraper::{Html, Selector};
use url::Url;

/// Resolves the next page URL from a document, or None to end the crawl
///
/// Only the first matching anchor is considered; if it carries no usable
/// href the crawl ends rather than falling through to later anchors.
pub fn next_page_url(document: &Html, current_url: &Url) -> Option<Url> {
    let selector = Selector::parse("a").ok()?;

    let anchor = document.select(&selector).find(|a| {
        let text = a.text().collect::<String>();
        text.contains("Next") || text.contains('>')
    })?;

    let href = anchor.value().attr("href")?;
    current_url.join(href).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> Url {
        Url::parse("https://example.com/list?page=2").unwrap()
    }

    #[test]
    fn test_next_text_matches() {
        let document =
            Html::parse_document(r#"<html><body><a href="/list?page=3">Next</a></body></html>"#);
        let next = next_page_url(&document, &current()).unwrap();
        assert_eq!(next.as_str(), "https://example.com/list?page=3");
    }

    #[test]
    fn test_angle_bracket_matches() {
        let document =
            Html::parse_document(r#"<html><body><a href="/list?page=3">&gt;</a></body></html>"#);
        let next = next_page_url(&document, &current()).unwrap();
        assert_eq!(next.as_str(), "https://example.com/list?page=3");
    }

    #[test]
    fn test_relative_href_resolved_against_current() {
        let document =
            Html::parse_document(r#"<html><body><a href="page3.html">Next page</a></body></html>"#);
        let next = next_page_url(&document, &current()).unwrap();
        assert_eq!(next.as_str(), "https://example.com/page3.html");
    }

    #[test]
    fn test_absolute_href_kept() {
        let document = Html::parse_document(
            r#"<html><body><a href="https://other.example.com/p3">Next</a></body></html>"#,
        );
        let next = next_page_url(&document, &current()).unwrap();
        assert_eq!(next.as_str(), "https://other.example.com/p3");
    }

    #[test]
    fn test_no_pagination_anchor() {
        let document = Html::parse_document(
            r#"<html><body><a href="/somewhere">Previous</a><p>no more pages</p></body></html>"#,
        );
        assert!(next_page_url(&document, &current()).is_none());
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let document =
            Html::parse_document(r#"<html><body><a href="/list?page=3">next</a></body></html>"#);
        assert!(next_page_url(&document, &current()).is_none());
    }

    #[test]
    fn test_substring_false_positive_preserved() {
        // "Nexted" contains "Next"; the loose match follows it. Known
        // limitation, kept deliberately.
        let document = Html::parse_document(
            r#"<html><body><a href="/unrelated">Nexted items</a></body></html>"#,
        );
        let next = next_page_url(&document, &current()).unwrap();
        assert_eq!(next.as_str(), "https://example.com/unrelated");
    }

    #[test]
    fn test_first_match_wins() {
        let document = Html::parse_document(
            r#"<html><body>
            <a href="/first">Next</a>
            <a href="/second">Next</a>
            </body></html>"#,
        );
        let next = next_page_url(&document, &current()).unwrap();
        assert_eq!(next.as_str(), "https://example.com/first");
    }

    #[test]
    fn test_first_match_without_href_ends_crawl() {
        // The first matching anchor has no href; later anchors are not
        // consulted.
        let document = Html::parse_document(
            r#"<html><body>
            <a>Next</a>
            <a href="/second">Next</a>
            </body></html>"#,
        );
        assert!(next_page_url(&document, &current()).is_none());
    }
}
