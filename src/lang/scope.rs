//! Enclosing-scope resolution.
//!
//! Maps every line of a file to the name of the definition it sits in, or
//! [`MODULE_SCOPE`] when it sits in none. Which strategy runs is decided once
//! per file from its extension (see [`ScopeStrategy`]).

use std::path::Path;

use serde::Serialize;

use crate::core::errors::Result;
use crate::lang::haskell::map_haskell_scopes;
use crate::lang::python::PythonScopeResolver;
use crate::lang::registry;

/// Name reported for lines outside every definition.
pub const MODULE_SCOPE: &str = "<module>";

/// Closed set of scope-resolution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeStrategy {
    /// Parse with tree-sitter Python and walk definitions.
    SyntaxTree,
    /// Track the most recent Haskell signature or equation line.
    LineHeuristic,
}

impl ScopeStrategy {
    /// Strategy for a file extension (with or without leading dot).
    pub fn for_extension(ext: &str) -> Self {
        registry::find_language_by_extension(ext)
            .map(|info| info.scope)
            .unwrap_or(Self::SyntaxTree)
    }

    /// Strategy for a file path; files without an extension use the syntax tree.
    pub fn for_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::for_extension)
            .unwrap_or(Self::SyntaxTree)
    }

    /// Short label used in logs and `list-languages`.
    pub fn label(self) -> &'static str {
        match self {
            Self::SyntaxTree => "syntax tree (python)",
            Self::LineHeuristic => "line heuristic (haskell)",
        }
    }
}

/// A definition's line range as found in a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeInterval {
    /// Line of the `def`/`class` keyword.
    pub start_line: usize,
    /// Largest start line among the definition's descendants.
    pub end_line: usize,
    /// Definition name.
    pub name: String,
}

/// Total line → scope mapping for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeMap {
    lines: Vec<String>,
}

impl ScopeMap {
    /// Mapping with no entries: every lookup yields [`MODULE_SCOPE`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Mapping for `line_count` lines, all at module level.
    pub fn module_level(line_count: usize) -> Self {
        Self {
            lines: vec![MODULE_SCOPE.to_string(); line_count],
        }
    }

    /// Build from intervals applied in order; later intervals overwrite earlier ones.
    pub fn from_intervals(line_count: usize, intervals: &[ScopeInterval]) -> Self {
        let mut map = Self::module_level(line_count);
        for interval in intervals {
            let last = interval.end_line.min(line_count);
            for line in interval.start_line.max(1)..=last {
                map.lines[line - 1].clone_from(&interval.name);
            }
        }
        map
    }

    pub(crate) fn push(&mut self, name: &str) {
        self.lines.push(name.to_string());
    }

    /// Scope for a 1-based line.
    pub fn scope_for(&self, line: usize) -> &str {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map_or(MODULE_SCOPE, String::as_str)
    }

    /// Number of lines with an explicit entry.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the mapping has no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `(line, scope)` pairs in line order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(idx, name)| (idx + 1, name.as_str()))
    }
}

/// Dispatches to the strategy chosen for each file.
///
/// Holds the tree-sitter parser so it is set up once per scan rather than per
/// file.
pub struct ScopeResolver {
    python: PythonScopeResolver,
}

impl ScopeResolver {
    /// Create a resolver with a ready Python parser.
    pub fn new() -> Result<Self> {
        Ok(Self {
            python: PythonScopeResolver::new()?,
        })
    }

    /// Resolve scopes for `source` with an explicit strategy.
    pub fn resolve(&mut self, source: &str, strategy: ScopeStrategy) -> Result<ScopeMap> {
        match strategy {
            ScopeStrategy::SyntaxTree => self.python.map_scopes(source),
            ScopeStrategy::LineHeuristic => Ok(map_haskell_scopes(source)),
        }
    }

    /// Resolve scopes for `source`, picking the strategy from `path`.
    pub fn resolve_for_path(&mut self, source: &str, path: &Path) -> Result<ScopeMap> {
        self.resolve(source, ScopeStrategy::for_path(path))
            .map_err(|e| e.in_file(path.display().to_string()))
    }
}
