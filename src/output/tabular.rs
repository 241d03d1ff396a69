//! CSV generation for tables and links
//!
//! Files start with a UTF-8 byte-order mark so spreadsheet applications
//! pick the right encoding when double-clicked. Quoting follows the usual
//! CSV rules: fields containing commas, quotes, or line breaks are wrapped
//! in quotes with inner quotes doubled.

use crate::crawler::{Link, Table};
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// UTF-8 byte-order mark for spreadsheet compatibility
const BOM: &str = "\u{feff}";

/// Writes one extracted table as a CSV file
///
/// Returns `Ok(None)` when the table has no rows.
pub fn write_table_csv(path: &Path, table: &Table) -> OutputResult<Option<PathBuf>> {
    if table.rows.is_empty() {
        tracing::info!("no rows to write, skipping {}", path.display());
        return Ok(None);
    }

    let mut content = String::from(BOM);
    for row in &table.rows {
        content.push_str(&format_row(row));
        content.push('\n');
    }

    write_file(path, &content)?;
    Ok(Some(path.to_path_buf()))
}

/// Writes all collected links as a two-column (label, URL) CSV file
///
/// Returns `Ok(None)` when no links were collected.
pub fn write_links_csv(path: &Path, links: &[Link]) -> OutputResult<Option<PathBuf>> {
    if links.is_empty() {
        tracing::info!("no links to write, skipping {}", path.display());
        return Ok(None);
    }

    let mut content = String::from(BOM);
    content.push_str("Label,URL\n");
    for link in links {
        content.push_str(&format_row(&[link.label.clone(), link.url.clone()]));
        content.push('\n');
    }

    write_file(path, &content)?;
    Ok(Some(path.to_path_buf()))
}

fn write_file(path: &Path, content: &str) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn format_row(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| escape_field(cell))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn table(rows: Vec<Vec<&str>>) -> Table {
        Table {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(String::from).collect())
                .collect(),
        }
    }

    #[test]
    fn test_plain_fields_unquoted() {
        assert_eq!(escape_field("plain"), "plain");
    }

    #[test]
    fn test_comma_field_quoted() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
    }

    #[test]
    fn test_quote_field_doubled() {
        assert_eq!(escape_field(r#"say "hi""#), r#""say ""hi""""#);
    }

    #[test]
    fn test_newline_field_quoted() {
        assert_eq!(escape_field("line1\nline2"), "\"line1\nline2\"");
    }

    #[test]
    fn test_table_csv_starts_with_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");

        write_table_csv(&path, &table(vec![vec!["a", "b"], vec!["c", "d"]]))
            .unwrap()
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('\u{feff}'));
        assert_eq!(content.trim_start_matches('\u{feff}'), "a,b\nc,d\n");
    }

    #[test]
    fn test_empty_table_is_noop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");

        let written = write_table_csv(&path, &table(vec![])).unwrap();

        assert!(written.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_links_csv_two_columns_with_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.csv");

        let links = vec![
            Link {
                label: "Docs, intro".to_string(),
                url: "https://example.com/docs".to_string(),
            },
            Link {
                label: "Home".to_string(),
                url: "https://example.com/".to_string(),
            },
        ];
        write_links_csv(&path, &links).unwrap().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let body = content.trim_start_matches('\u{feff}');
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("Label,URL"));
        assert_eq!(lines.next(), Some("\"Docs, intro\",https://example.com/docs"));
        assert_eq!(lines.next(), Some("Home,https://example.com/"));
    }

    #[test]
    fn test_empty_links_is_noop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.csv");

        assert!(write_links_csv(&path, &[]).unwrap().is_none());
        assert!(!path.exists());
    }
}
