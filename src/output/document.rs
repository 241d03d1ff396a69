//! Text document generation
//!
//! Writes the collected (optionally summarized) text blocks as a paginated
//! markdown document. HTML entities that survived extraction are decoded
//! before writing.

use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Text blocks per document page section
const BLOCKS_PER_PAGE: usize = 12;

/// Writes text blocks as a paginated markdown document
///
/// Returns `Ok(None)` without touching the filesystem when there is nothing
/// to write.
pub fn write_text_document(path: &Path, blocks: &[String]) -> OutputResult<Option<PathBuf>> {
    if blocks.is_empty() {
        tracing::info!("no text blocks to write, skipping document");
        return Ok(None);
    }

    let content = format_document(blocks);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(Some(path.to_path_buf()))
}

/// Formats text blocks as markdown with page-break headings
pub fn format_document(blocks: &[String]) -> String {
    let mut md = String::new();
    md.push_str("# Extracted Content\n");
    md.push_str(&format!(
        "\nGenerated {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));

    for (i, block) in blocks.iter().enumerate() {
        if i % BLOCKS_PER_PAGE == 0 {
            md.push_str(&format!("\n## Page {}\n\n", i / BLOCKS_PER_PAGE + 1));
        } else {
            md.push('\n');
        }
        md.push_str(decode_entities(block).trim());
        md.push('\n');
    }

    md
}

/// Decodes the common named and numeric HTML entities
///
/// `&amp;` is handled last so already-escaped sequences like `&amp;lt;`
/// decode to the literal `&lt;` instead of `<`.
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
