//! Language-agnostic comment tokenizer.
//!
//! Recognizes four comment syntaxes with one combined grammar, tried at every
//! scan position in this order:
//!
//! ```text
//! /* ... */   block comment, may span lines, delimiters kept
//! // ...      line comment to end of line
//! #  ...      line comment to end of line
//! -- ...      line comment to end of line
//! ```
//!
//! The scanner knows nothing about string literals or nesting, so `"/*"` in a
//! string or `i--` in C opens a comment just the same. An unterminated `/*`
//! never matches; its characters are skipped one at a time like any other
//! unrecognized input.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static COMMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:/\*(?s:.*?)\*/|//[^\n]*|#[^\n]*|--[^\n]*)")
        .expect("comment grammar is a valid regex")
});

/// Syntax family a comment span was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStyle {
    /// `/* ... */`
    Block,
    /// `// ...`
    DoubleSlash,
    /// `# ...`
    Hash,
    /// `-- ...`
    DoubleDash,
}

impl CommentStyle {
    /// Opening delimiter as written in source.
    pub fn opener(self) -> &'static str {
        match self {
            Self::Block => "/*",
            Self::DoubleSlash => "//",
            Self::Hash => "#",
            Self::DoubleDash => "--",
        }
    }

    fn classify(text: &str) -> Self {
        if text.starts_with("/*") {
            Self::Block
        } else if text.starts_with("//") {
            Self::DoubleSlash
        } else if text.starts_with('#') {
            Self::Hash
        } else {
            Self::DoubleDash
        }
    }
}

/// One comment found in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSpan<'a> {
    /// 1-based line on which the comment opened.
    pub start_line: usize,
    /// Comment text including its delimiters.
    pub text: &'a str,
    /// Which syntax matched.
    pub style: CommentStyle,
}

/// Lazy scanner yielding [`CommentSpan`]s in source order.
///
/// The iterator is single-pass: once exhausted it stays exhausted.
#[derive(Debug, Clone)]
pub struct CommentTokenizer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> CommentTokenizer<'a> {
    /// Start scanning `source` at line 1.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
        }
    }
}

impl<'a> Iterator for CommentTokenizer<'a> {
    type Item = CommentSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = &self.source[self.pos..];
            let ch = rest.chars().next()?;

            match ch {
                '\n' => {
                    self.line += 1;
                    self.pos += 1;
                    continue;
                }
                ' ' | '\t' | '\r' => {
                    self.pos += 1;
                    continue;
                }
                '/' | '#' | '-' => {
                    if let Some(found) = COMMENT_PATTERN.find(rest) {
                        let text = &rest[..found.end()];
                        let span = CommentSpan {
                            start_line: self.line,
                            text,
                            style: CommentStyle::classify(text),
                        };
                        self.line += text.matches('\n').count();
                        self.pos += found.end();
                        return Some(span);
                    }
                }
                _ => {}
            }

            // Not a comment opener: drop the character and keep going.
            self.pos += ch.len_utf8();
        }
    }
}

/// Tokenize `source` into its comment spans.
pub fn tokenize(source: &str) -> CommentTokenizer<'_> {
    CommentTokenizer::new(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(source: &str) -> Vec<(usize, &str)> {
        tokenize(source).map(|s| (s.start_line, s.text)).collect()
    }

    #[test]
    fn test_all_four_styles() {
        let source = "/* block */\n// slash\n# hash\n-- dash\n";
        let found: Vec<_> = tokenize(source).map(|s| (s.start_line, s.style)).collect();
        assert_eq!(
            found,
            vec![
                (1, CommentStyle::Block),
                (2, CommentStyle::DoubleSlash),
                (3, CommentStyle::Hash),
                (4, CommentStyle::DoubleDash),
            ]
        );
    }

    #[test]
    fn test_line_comment_excludes_newline() {
        assert_eq!(spans("# TODO: test unit\n"), vec![(1, "# TODO: test unit")]);
    }

    #[test]
    fn test_block_comment_reports_opening_line_and_advances_counter() {
        let source = "int x;\n/* first\n * second\n */\nint y; // after\n";
        assert_eq!(
            spans(source),
            vec![(2, "/* first\n * second\n */"), (5, "// after")]
        );
    }

    #[test]
    fn test_block_comment_is_non_greedy() {
        let source = "/* a */ code /* b */";
        assert_eq!(spans(source), vec![(1, "/* a */"), (1, "/* b */")]);
    }

    #[test]
    fn test_code_only_file_has_no_spans() {
        assert!(spans("int main() { return 0; }\n").is_empty());
        assert!(spans("").is_empty());
    }

    #[test]
    fn test_naive_matching_inside_strings_and_operators() {
        let source = "s = \"# not really\"\ni--;\n";
        assert_eq!(spans(source), vec![(1, "# not really\""), (2, "--;")]);
    }

    #[test]
    fn test_line_marker_inside_block_is_part_of_block() {
        let source = "/* // inner # still block */";
        assert_eq!(spans(source), vec![(1, "/* // inner # still block */")]);
    }

    #[test]
    fn test_unterminated_block_is_skipped_character_wise() {
        let source = "/* never closed\n// real comment\n";
        assert_eq!(spans(source), vec![(2, "// real comment")]);
    }

    #[test]
    fn test_crlf_and_unicode_do_not_confuse_positions() {
        let source = "let s = \"héllo\";\r\n// naïve TODO\r\n";
        assert_eq!(spans(source), vec![(2, "// naïve TODO\r")]);
    }

    #[test]
    fn test_tokenizer_is_exhausted_once() {
        let mut tokenizer = tokenize("# one\n");
        assert!(tokenizer.next().is_some());
        assert!(tokenizer.next().is_none());
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_multiline_block_is_one_span() {
        let spans: Vec<_> = tokenize("/* a\nb\nc */
# d").collect();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].style.opener(), "/*");
        assert_eq!(spans[1].start_line, 4);
    }
}
