//! Configuration types for todo-md scans.
//!
//! A [`ScanConfig`] decides which files are visited, which marker keywords are
//! recognized, which extraction policy runs and whether enclosing scopes are
//! resolved. It round-trips through YAML so teams can check a `.todo-md.yml`
//! into their repository.

use std::path::PathBuf;

use globset::Glob;
use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TodoMdError};
use crate::lang::markers::{ExtractionPolicy, MarkerPatterns};

/// Extensions scanned by default (without leading dots).
pub const DEFAULT_EXTENSIONS: &[&str] = &["py", "js", "java", "c", "h", "hs"];

/// Extensions scanned by the first-generation line scanner.
pub const LEGACY_EXTENSIONS: &[&str] = &["py", "js", "java", "hs"];

/// Marker keywords recognized by default.
pub const DEFAULT_MARKERS: &[&str] = &["TODO", "FIXME"];

/// Main configuration for a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions to scan, without leading dots
    pub extensions: Vec<String>,

    /// Marker keywords, matched case-insensitively and reported upper-case
    pub markers: Vec<String>,

    /// How markers are pulled out of each file
    pub extraction: ExtractionPolicy,

    /// Attach the enclosing function/class name to every item
    pub resolve_scopes: bool,

    /// Glob patterns for paths that are never scanned
    pub exclude_patterns: Vec<String>,

    /// Follow symbolic links while walking directories
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new_with_defaults()
    }
}

impl ScanConfig {
    /// Construct the canonical defaults shared by the CLI and library callers.
    pub fn new_with_defaults() -> Self {
        Self {
            extensions: to_owned_list(DEFAULT_EXTENSIONS),
            markers: to_owned_list(DEFAULT_MARKERS),
            extraction: ExtractionPolicy::Comment,
            resolve_scopes: true,
            exclude_patterns: Vec::new(),
            follow_links: false,
        }
    }

    /// Preset reproducing the first-generation scanner: raw line matching,
    /// upper-case-only markers, no scope column.
    pub fn legacy() -> Self {
        Self {
            extensions: to_owned_list(LEGACY_EXTENSIONS),
            extraction: ExtractionPolicy::Line,
            resolve_scopes: false,
            ..Self::new_with_defaults()
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            TodoMdError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            TodoMdError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Whether a file extension (with or without leading dot) is in the allow-list.
    ///
    /// Matching is case-sensitive: `A.PY` is not a Python file.
    pub fn allows_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        self.extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.') == ext)
    }

    /// Compile the marker patterns for this configuration.
    pub fn marker_patterns(&self) -> Result<MarkerPatterns> {
        MarkerPatterns::new(&self.markers)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(TodoMdError::config_field(
                "at least one file extension is required",
                "extensions",
            ));
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(TodoMdError::config_field(
                format!("invalid extension '{bad}'"),
                "extensions",
            ));
        }

        if self.markers.is_empty() {
            return Err(TodoMdError::config_field(
                "at least one marker keyword is required",
                "markers",
            ));
        }
        for marker in &self.markers {
            if marker.is_empty() || !marker.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(TodoMdError::Validation {
                    message: format!("marker '{marker}' must be a single word"),
                    field: Some("markers".to_string()),
                    expected: Some("letters, digits or underscores".to_string()),
                    actual: Some(marker.clone()),
                });
            }
        }

        for pattern in &self.exclude_patterns {
            Glob::new(pattern)?;
        }

        Ok(())
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
