//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing extracted (or summarized) text as a markdown document
//! - Writing each table and the link list as CSV files
//! - Collecting the paths that were actually written
//!
//! A failed write is logged and that output simply reported absent; it
//! never aborts the remaining writes.

mod document;
mod tabular;

pub use document::{decode_entities, format_document, write_text_document};
pub use tabular::{write_links_csv, write_table_csv};

use crate::config::OutputConfig;
use crate::crawler::{Link, Table};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists all crawl outputs and returns the written paths
///
/// Outputs: the text document, one CSV per table
/// (`{prefix}_table{N}.csv`), and the links CSV (`{prefix}_links.csv`).
/// Empty collections are skipped silently; write failures are logged and
/// skipped so one bad path cannot take the rest down.
pub fn persist_results(
    config: &OutputConfig,
    texts: &[String],
    tables: &[Table],
    links: &[Link],
) -> Vec<PathBuf> {
    let mut written = Vec::new();

    match write_text_document(Path::new(&config.document_path), texts) {
        Ok(Some(path)) => written.push(path),
        Ok(None) => {}
        Err(e) => error!("failed to write document {}: {}", config.document_path, e),
    }

    for (i, table) in tables.iter().enumerate() {
        let path = PathBuf::from(format!("{}_table{}.csv", config.tabular_prefix, i + 1));
        match write_table_csv(&path, table) {
            Ok(Some(path)) => written.push(path),
            Ok(None) => {}
            Err(e) => error!("failed to write table {}: {}", path.display(), e),
        }
    }

    let links_path = PathBuf::from(format!("{}_links.csv", config.tabular_prefix));
    match write_links_csv(&links_path, links) {
        Ok(Some(path)) => written.push(path),
        Ok(None) => {}
        Err(e) => error!("failed to write links {}: {}", links_path.display(), e),
    }

    written
}
