//! Metadata for the languages todo-md knows how to scan.

use crate::lang::comments::CommentStyle;
use crate::lang::scope::ScopeStrategy;

/// Metadata describing one of the built-in languages.
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    /// Canonical short key (e.g. "py").
    pub key: &'static str,
    /// Human-friendly display name.
    pub name: &'static str,
    /// Supported file extensions (without leading dots).
    pub extensions: &'static [&'static str],
    /// Comment syntaxes that carry markers in this language.
    pub comment_styles: &'static [CommentStyle],
    /// How enclosing scopes are resolved.
    pub scope: ScopeStrategy,
    /// Feature notes for `list-languages`.
    pub notes: &'static str,
}

const REGISTERED_LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        key: "py",
        name: "Python",
        extensions: &["py"],
        comment_styles: &[CommentStyle::Hash],
        scope: ScopeStrategy::SyntaxTree,
        notes: "Functions, async functions and classes",
    },
    LanguageInfo {
        key: "js",
        name: "JavaScript",
        extensions: &["js"],
        comment_styles: &[CommentStyle::Block, CommentStyle::DoubleSlash],
        scope: ScopeStrategy::SyntaxTree,
        notes: "Parsed with the Python grammar; usually reports <module>",
    },
    LanguageInfo {
        key: "java",
        name: "Java",
        extensions: &["java"],
        comment_styles: &[CommentStyle::Block, CommentStyle::DoubleSlash],
        scope: ScopeStrategy::SyntaxTree,
        notes: "Parsed with the Python grammar; usually reports <module>",
    },
    LanguageInfo {
        key: "c",
        name: "C",
        extensions: &["c", "h"],
        comment_styles: &[CommentStyle::Block, CommentStyle::DoubleSlash],
        scope: ScopeStrategy::SyntaxTree,
        notes: "Parsed with the Python grammar; usually reports <module>",
    },
    LanguageInfo {
        key: "hs",
        name: "Haskell",
        extensions: &["hs"],
        comment_styles: &[CommentStyle::DoubleDash],
        scope: ScopeStrategy::LineHeuristic,
        notes: "Signature and equation lines; scopes never close",
    },
];

/// Return the languages that are compiled into this build.
pub fn registered_languages() -> &'static [LanguageInfo] {
    REGISTERED_LANGUAGES
}

/// Finds the language info for a given file extension.
pub fn find_language_by_extension(ext: &str) -> Option<&'static LanguageInfo> {
    let target = ext.trim_start_matches('.');
    if target.is_empty() {
        return None;
    }
    registered_languages().iter().find(|info| {
        info.extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(target))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_lookup_by_extension() {
        let key = |ext| find_language_by_extension(ext).map(|info| info.key);
        assert_eq!(key("py"), Some("py"));
        assert_eq!(key(".js"), Some("js"));
        assert_eq!(key("h"), Some("c"));
        assert_eq!(key("HS"), Some("hs"));
        assert_eq!(key("rs"), None);
        assert_eq!(key("."), None);
    }

    #[test]
    fn test_only_haskell_uses_heuristic() {
        let heuristic: Vec<_> = registered_languages()
            .iter()
            .filter(|info| info.scope == ScopeStrategy::LineHeuristic)
            .map(|info| info.key)
            .collect();
        assert_eq!(heuristic, vec!["hs"]);
    }

    #[test]
    fn test_default_extensions_are_registered() {
        for ext in crate::core::config::DEFAULT_EXTENSIONS {
            assert!(find_language_by_extension(ext).is_some(), "{ext} missing from registry");
        }
    }
}
