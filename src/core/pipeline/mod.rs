//! Scan pipeline: discovery, extraction, scope resolution and the join.
//!
//! Files are processed one at a time and to completion. For each file the
//! marker extractor and the scope resolver run over the same text, and every
//! marker is then tagged with the scope of its line. Failures stay local to
//! the file they happen in:
//!
//! ```text
//! unreadable / non-UTF-8 file  -> no items from that file
//! scope parse failure          -> every item in that file gets <module>
//! nothing found anywhere       -> ScanOutcome::NoItems
//! ```

pub mod file_discovery;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::config::ScanConfig;
use crate::core::errors::Result;
use crate::core::file_utils::FileReader;
use crate::lang::markers::{MarkerExtractor, MarkerRecord};
use crate::lang::scope::{ScopeMap, ScopeResolver};

pub use file_discovery::discover_files;

/// One joined row of the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportItem {
    /// File the marker was found in, as discovered.
    pub file_path: PathBuf,
    /// 1-based line the marker is attributed to.
    pub line: usize,
    /// Enclosing scope; present only when scope resolution is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Upper-cased marker keyword.
    pub kind: String,
    /// Text following the marker.
    pub text: String,
}

impl ReportItem {
    fn from_record(path: &Path, record: MarkerRecord, scope: Option<String>) -> Self {
        Self {
            file_path: path.to_path_buf(),
            line: record.line,
            scope,
            kind: record.kind,
            text: record.text,
        }
    }
}

/// Terminal result of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// At least one marker was found.
    Items(Vec<ReportItem>),
    /// Nothing to report. Not an error.
    NoItems,
}

impl ScanOutcome {
    fn from_items(items: Vec<ReportItem>) -> Self {
        if items.is_empty() {
            Self::NoItems
        } else {
            Self::Items(items)
        }
    }

    /// Items found, empty for [`ScanOutcome::NoItems`].
    pub fn items(&self) -> &[ReportItem] {
        match self {
            Self::Items(items) => items,
            Self::NoItems => &[],
        }
    }

    /// Consume the outcome, returning its items.
    pub fn into_items(self) -> Vec<ReportItem> {
        match self {
            Self::Items(items) => items,
            Self::NoItems => Vec::new(),
        }
    }

    /// Whether the scan found nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoItems)
    }
}

/// Single-threaded scan coordinator.
pub struct ScanPipeline {
    config: ScanConfig,
    extractor: MarkerExtractor,
    resolver: Option<ScopeResolver>,
}

impl ScanPipeline {
    /// Validate `config` and compile everything the scan needs.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;

        let extractor = MarkerExtractor::new(config.extraction, config.marker_patterns()?);
        let resolver = if config.resolve_scopes {
            Some(ScopeResolver::new()?)
        } else {
            None
        };

        Ok(Self {
            config,
            extractor,
            resolver,
        })
    }

    /// Configuration in effect.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Discover and scan every file under `root`.
    pub fn scan(&mut self, root: &Path) -> Result<ScanOutcome> {
        let files = discover_files(root, &self.config)?;
        Ok(self.scan_files(&files))
    }

    /// Scan an explicit list of files in the given order.
    pub fn scan_files(&mut self, files: &[PathBuf]) -> ScanOutcome {
        let mut items = Vec::new();
        for path in files {
            items.extend(self.scan_file(path));
        }

        info!(
            "Scan completed: {} items from {} files",
            items.len(),
            files.len()
        );
        ScanOutcome::from_items(items)
    }

    /// Scan a single file; read failures yield no items.
    pub fn scan_file(&mut self, path: &Path) -> Vec<ReportItem> {
        match FileReader::read_to_string(path) {
            Ok(source) => self.scan_source(path, &source),
            Err(err) => {
                warn!("Skipping {}: {err}", path.display());
                Vec::new()
            }
        }
    }

    /// Extract, resolve and join for already-loaded source text.
    ///
    /// `path` labels the items and picks the scope strategy; it is not read.
    pub fn scan_source(&mut self, path: &Path, source: &str) -> Vec<ReportItem> {
        let records = self.extractor.extract(source);
        debug!("{}: {} markers", path.display(), records.len());
        if records.is_empty() {
            return Vec::new();
        }

        let Some(resolver) = self.resolver.as_mut() else {
            return records
                .into_iter()
                .map(|record| ReportItem::from_record(path, record, None))
                .collect();
        };

        let scopes = resolver.resolve_for_path(source, path).unwrap_or_else(|err| {
            debug!("No scope mapping for {}: {err}", path.display());
            ScopeMap::empty()
        });

        records
            .into_iter()
            .map(|record| {
                let scope = scopes.scope_for(record.line).to_string();
                ReportItem::from_record(path, record, Some(scope))
            })
            .collect()
    }
}
