//! Report rendering.
//!
//! Markdown is the primary format. With scope resolution enabled the table
//! carries a `Context` column and the title says `v2`; without it the layout
//! matches the first-generation report. JSON is available for tooling.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::core::errors::{Result, ResultExt, TodoMdError};
use crate::core::pipeline::ReportItem;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Markdown table.
    #[default]
    Markdown,
    /// Pretty-printed JSON document.
    Json,
}

impl ReportFormat {
    /// Human-readable name used in CLI messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Json => "JSON",
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    scanned_directory: &'a str,
    found: usize,
    items: &'a [ReportItem],
}

/// Renders and writes reports.
#[derive(Debug, Clone, Copy)]
pub struct ReportWriter {
    format: ReportFormat,
    with_context: bool,
}

impl ReportWriter {
    /// Writer for `format`; `with_context` adds the scope column.
    pub fn new(format: ReportFormat, with_context: bool) -> Self {
        Self {
            format,
            with_context,
        }
    }

    /// Render `items` for a scan of `scanned_root`.
    pub fn render(&self, items: &[ReportItem], scanned_root: &str) -> Result<String> {
        match self.format {
            ReportFormat::Markdown => Ok(self.render_markdown(items, scanned_root)),
            ReportFormat::Json => {
                let report = JsonReport {
                    scanned_directory: scanned_root,
                    found: items.len(),
                    items,
                };
                let mut content = serde_json::to_string_pretty(&report)?;
                content.push('\n');
                Ok(content)
            }
        }
    }

    /// Render and write to `output_path`; returns the number of items written.
    pub fn write_report(
        &self,
        items: &[ReportItem],
        scanned_root: &str,
        output_path: &Path,
    ) -> Result<usize> {
        let content = self.render(items, scanned_root)?;

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(output_path, content).map_err(|e| {
            TodoMdError::io(
                format!("Failed to write report to {}", output_path.display()),
                e,
            )
        })?;

        info!(
            "Wrote {} items to {}",
            items.len(),
            output_path.display()
        );
        Ok(items.len())
    }

    fn render_markdown(&self, items: &[ReportItem], scanned_root: &str) -> String {
        let mut out = String::new();

        if self.with_context {
            out.push_str("# TODO-MD v2 Report\n\n");
        } else {
            out.push_str("# TODO-MD Report\n\n");
        }
        out.push_str(&format!("**Scanned directory:** `{scanned_root}`  \n"));
        out.push_str(&format!("**Found:** {} items\n\n", items.len()));

        if self.with_context {
            out.push_str("| # | File | Line | Context | Marker | Comment |\n");
            out.push_str("|---|------|-----:|---------|--------|---------|\n");
        } else {
            out.push_str("| # | File | Line | Marker | Comment |\n");
            out.push_str("|---|------|-----:|--------|---------|\n");
        }

        for (idx, item) in items.iter().enumerate() {
            let path = item.file_path.display();
            let text = escape_cell(&item.text);
            if self.with_context {
                let scope = escape_cell(item.scope.as_deref().unwrap_or_default());
                out.push_str(&format!(
                    "| {} | `{}` | {} | {} | {} | {} |\n",
                    idx + 1,
                    path,
                    item.line,
                    scope,
                    item.kind,
                    text
                ));
            } else {
                out.push_str(&format!(
                    "| {} | `{}` | {} | {} | {} |\n",
                    idx + 1,
                    path,
                    item.line,
                    item.kind,
                    text
                ));
            }
        }

        out
    }
}

/// Keep a value from breaking out of its table cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn item(path: &str, line: usize, scope: Option<&str>, kind: &str, text: &str) -> ReportItem {
        ReportItem {
            file_path: PathBuf::from(path),
            line,
            scope: scope.map(str::to_string),
            kind: kind.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_v1_layout() {
        let writer = ReportWriter::new(ReportFormat::Markdown, false);
        let out = writer
            .render(&[item("src/a.py", 1, None, "TODO", "cli test")], "src")
            .unwrap();
        assert!(out.starts_with("# TODO-MD Report\n\n"));
        assert!(out.contains("**Scanned directory:** `src`  \n"));
        assert!(out.contains("**Found:** 1 items\n"));
        assert!(out.contains("| # | File | Line | Marker | Comment |\n"));
        assert!(out.contains("| 1 | `src/a.py` | 1 | TODO | cli test |\n"));
    }

    #[test]
    fn test_v2_layout_with_context() {
        let writer = ReportWriter::new(ReportFormat::Markdown, true);
        let items = [
            item("util.c", 1, Some("<module>"), "TODO", "handle overflow in add()"),
            item("example.py", 6, Some("foo"), "FIXME", "edge case"),
        ];
        let out = writer.render(&items, "proj").unwrap();
        assert!(out.starts_with("# TODO-MD v2 Report\n\n"));
        assert!(out.contains("| # | File | Line | Context | Marker | Comment |\n"));
        assert!(out.contains("| 1 | `util.c` | 1 | <module> | TODO | handle overflow in add() |\n"));
        assert!(out.contains("| 2 | `example.py` | 6 | foo | FIXME | edge case |\n"));
    }

    #[test]
    fn test_zero_items_is_valid_empty_table() {
        let writer = ReportWriter::new(ReportFormat::Markdown, true);
        let out = writer.render(&[], "empty").unwrap();
        assert!(out.contains("**Found:** 0 items"));
        assert!(out.ends_with("|---|------|-----:|---------|--------|---------|\n"));
    }

    #[test]
    fn test_pipes_are_escaped() {
        let writer = ReportWriter::new(ReportFormat::Markdown, false);
        let out = writer
            .render(&[item("a.js", 3, None, "TODO", "a || b")], ".")
            .unwrap();
        assert!(out.contains("| TODO | a \\|\\| b |"));
    }

    #[test]
    fn test_json_report() {
        let writer = ReportWriter::new(ReportFormat::Json, false);
        let out = writer
            .render(&[item("a.py", 2, None, "FIXME", "two")], "root")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["scanned_directory"], "root");
        assert_eq!(value["found"], 1);
        assert_eq!(value["items"][0]["kind"], "FIXME");
        assert!(value["items"][0].get("scope").is_none());
    }

    #[test]
    fn test_write_report_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("reports").join("todo.md");
        let writer = ReportWriter::new(ReportFormat::Markdown, false);
        let count = writer
            .write_report(&[item("a.py", 1, None, "TODO", "x")], "src", &output)
            .unwrap();
        assert_eq!(count, 1);
        assert!(fs::read_to_string(&output).unwrap().contains("| 1 |"));
    }
}
