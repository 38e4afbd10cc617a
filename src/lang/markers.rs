//! Marker extraction: turning comments into TODO/FIXME records.
//!
//! Two acceptance policies exist side by side and are chosen explicitly by the
//! caller through [`ExtractionPolicy`]:
//!
//! - [`ExtractionPolicy::Comment`] tokenizes the file, then reports every
//!   whole-word marker in every comment, case-insensitively. All markers in a
//!   span carry the span's opening line.
//! - [`ExtractionPolicy::Line`] reads raw lines, takes the first marker on each
//!   line and keeps it only when the marker starts with an upper-case letter in
//!   the source. It knows nothing about comment syntax.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::config::DEFAULT_MARKERS;
use crate::core::errors::{Result, TodoMdError};
use crate::lang::comments::{tokenize, CommentSpan};

/// Trailing block-comment close left on the last marker of a `/* */` span.
static BLOCK_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\*/\s*$").expect("block close pattern is a valid regex"));

static DEFAULT_PATTERNS: Lazy<MarkerPatterns> = Lazy::new(|| {
    MarkerPatterns::new(DEFAULT_MARKERS).expect("default markers compile")
});

/// Which marker-acceptance rules a scan applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPolicy {
    /// Comment-aware, case-insensitive, many markers per comment.
    #[default]
    Comment,
    /// Raw lines, upper-case initial required, one marker per line.
    Line,
}

/// One marker occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerRecord {
    /// 1-based source line the marker is attributed to.
    pub line: usize,
    /// Marker keyword, upper-cased.
    pub kind: String,
    /// Free text following the marker.
    pub text: String,
}

impl MarkerRecord {
    fn new(line: usize, keyword: &str, text: &str) -> Self {
        Self {
            line,
            kind: keyword.to_uppercase(),
            text: text.to_string(),
        }
    }
}

/// Compiled marker grammars for one keyword set.
#[derive(Debug, Clone)]
pub struct MarkerPatterns {
    keyword: Regex,
    legacy_line: Regex,
}

impl MarkerPatterns {
    /// Compile patterns for the given keywords.
    pub fn new<S: AsRef<str>>(markers: &[S]) -> Result<Self> {
        if markers.is_empty() {
            return Err(TodoMdError::config_field(
                "at least one marker keyword is required",
                "markers",
            ));
        }

        let alternation = markers
            .iter()
            .map(|m| regex::escape(m.as_ref()))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            keyword: Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?,
            legacy_line: Regex::new(&format!(
                r"(?i)(?P<marker>{alternation})[\s:,-]*(?P<text>.*)"
            ))?,
        })
    }

    /// Patterns for the built-in `TODO`/`FIXME` set.
    pub fn defaults() -> &'static MarkerPatterns {
        &DEFAULT_PATTERNS
    }
}

/// Extract every marker in one comment span.
///
/// The text of an occurrence runs to the next occurrence or the end of its
/// line, whichever is first. Only the final occurrence can end in a block
/// close, so only its text is trimmed of `*/`.
pub fn extract_from_comment(patterns: &MarkerPatterns, span: &CommentSpan<'_>) -> Vec<MarkerRecord> {
    let text = span.text;
    let hits: Vec<_> = patterns.keyword.find_iter(text).collect();

    let mut records = Vec::with_capacity(hits.len());
    for (idx, hit) in hits.iter().enumerate() {
        let segment_end = hits.get(idx + 1).map_or(text.len(), |next| next.start());
        let segment = &text[hit.end()..segment_end];
        let segment = segment.split('\n').next().unwrap_or_default();

        let mut body = segment
            .trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace())
            .trim_end();
        if idx + 1 == hits.len() {
            body = strip_block_close(body);
        }

        records.push(MarkerRecord::new(span.start_line, hit.as_str(), body));
    }
    records
}

/// First-generation extraction over raw source lines.
pub fn extract_from_lines(patterns: &MarkerPatterns, source: &str) -> Vec<MarkerRecord> {
    let mut records = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let Some(caps) = patterns.legacy_line.captures(line) else {
            continue;
        };
        let marker = &caps["marker"];
        if !marker.chars().next().is_some_and(char::is_uppercase) {
            continue;
        }
        records.push(MarkerRecord::new(idx + 1, marker, caps["text"].trim()));
    }

    records
}

fn strip_block_close(text: &str) -> &str {
    match BLOCK_CLOSE.find(text) {
        Some(close) => &text[..close.start()],
        None => text,
    }
}

/// Policy plus compiled patterns: the single entry point the pipeline uses.
#[derive(Debug, Clone)]
pub struct MarkerExtractor {
    policy: ExtractionPolicy,
    patterns: MarkerPatterns,
}

impl MarkerExtractor {
    /// Build an extractor for `policy` over `patterns`.
    pub fn new(policy: ExtractionPolicy, patterns: MarkerPatterns) -> Self {
        Self { policy, patterns }
    }

    /// Extract all markers from a whole file's text, in discovery order.
    pub fn extract(&self, source: &str) -> Vec<MarkerRecord> {
        match self.policy {
            ExtractionPolicy::Comment => tokenize(source)
                .flat_map(|span| extract_from_comment(&self.patterns, &span))
                .collect(),
            ExtractionPolicy::Line => extract_from_lines(&self.patterns, source),
        }
    }
}

impl Default for MarkerExtractor {
    fn default() -> Self {
        Self::new(ExtractionPolicy::default(), MarkerPatterns::defaults().clone())
    }
}
