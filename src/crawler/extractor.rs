//! Content extraction from parsed pages
//!
//! Pure functions over a parsed document. Everything is returned in document
//! order: paragraph and heading text, outbound links, tables, and raw image
//! URLs. Image URLs are deliberately unfiltered here; normalization happens
//! in the image text service.

use crate::crawler::{Link, PageContent, Table};
use scraper::{Html, Selector};

/// Extracts all four content categories from a parsed document
pub fn extract_content(document: &Html) -> PageContent {
    PageContent {
        texts: extract_text_blocks(document),
        links: extract_links(document),
        tables: extract_tables(document),
        image_urls: extract_image_urls(document),
    }
}

/// Extracts the trimmed text of every paragraph and heading element
///
/// Empty blocks are dropped; order follows the document.
pub fn extract_text_blocks(document: &Html) -> Vec<String> {
    let mut blocks = Vec::new();

    let Ok(selector) = Selector::parse("p, h1, h2, h3, h4, h5, h6") else {
        return blocks;
    };

    for element in document.select(&selector) {
        let text = element.text().collect::<String>().trim().to_string();
        if !text.is_empty() {
            blocks.push(text);
        }
    }

    blocks
}

/// Extracts outbound links, keeping only hrefs that start with `http`
///
/// Relative paths, fragments, and mailto links are dropped rather than
/// resolved; the crawl follows pagination links only, and those are handled
/// separately.
pub fn extract_links(document: &Html) -> Vec<Link> {
    let mut links = Vec::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href.starts_with("http") {
            continue;
        }
        links.push(Link {
            label: element.text().collect::<String>().trim().to_string(),
            url: href.to_string(),
        });
    }

    links
}

/// Extracts tables as rows of trimmed cell strings
///
/// A row survives only if at least one cell is non-empty, and a table
/// survives only if at least one row does.
pub fn extract_tables(document: &Html) -> Vec<Table> {
    let mut tables = Vec::new();

    let Ok(table_selector) = Selector::parse("table") else {
        return tables;
    };
    let Ok(row_selector) = Selector::parse("tr") else {
        return tables;
    };
    let Ok(cell_selector) = Selector::parse("td, th") else {
        return tables;
    };

    for table_element in document.select(&table_selector) {
        let mut rows = Vec::new();

        for row_element in table_element.select(&row_selector) {
            let cells: Vec<String> = row_element
                .select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();

            if cells.iter().any(|cell| !cell.is_empty()) {
                rows.push(cells);
            }
        }

        if !rows.is_empty() {
            tables.push(Table { rows });
        }
    }

    tables
}

/// Extracts the `src` of every image element that carries one
pub fn extract_image_urls(document: &Html) -> Vec<String> {
    let mut urls = Vec::new();

    let Ok(selector) = Selector::parse("img[src]") else {
        return urls;
    };

    for element in document.select(&selector) {
        if let Some(src) = element.value().attr("src") {
            urls.push(src.to_string());
        }
    }

    urls
}
