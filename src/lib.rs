//! # todo-md: TODO/FIXME extraction for source trees
//!
//! Scans a directory for pending-work markers in comments and reports each one
//! with its file, line, enclosing scope and trailing text.
//!
//! ## Architecture
//!
//! ```text
//! file text ──► CommentTokenizer ──► comment spans ──► MarkerExtractor ──┐
//!     │                                                                  ├──► ReportItem
//!     └───────► ScopeResolver (tree-sitter / line heuristic) ──► ScopeMap ┘
//! ```
//!
//! - **lang::comments**: one grammar for `/* */`, `//`, `#` and `--` comments
//! - **lang::markers**: comment-aware and legacy line extraction policies
//! - **lang::scope**: line → enclosing definition, Python or Haskell style
//! - **core::pipeline**: discovery, per-file isolation and the join
//! - **io::reports**: Markdown and JSON output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use todo_md::{ScanConfig, ScanOutcome, ScanPipeline};
//!
//! fn main() -> todo_md::Result<()> {
//!     let mut pipeline = ScanPipeline::new(ScanConfig::default())?;
//!     match pipeline.scan(Path::new("./src"))? {
//!         ScanOutcome::Items(items) => println!("{} markers", items.len()),
//!         ScanOutcome::NoItems => println!("No TODOs/FIXMEs found."),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]

// Configuration, errors and the scan pipeline
pub mod core {
    //! Configuration, error handling and the scan pipeline.

    pub mod config;
    pub mod errors;
    pub mod file_utils;
    pub mod pipeline;
}

// Comment, marker and scope analysis
pub mod lang {
    //! Comment tokenizing, marker extraction and scope resolution.

    pub mod comments;
    pub mod haskell;
    pub mod markers;
    pub mod python;
    pub mod registry;
    pub mod scope;
}

// Report output
pub mod io {
    //! Report rendering and writing.

    pub mod reports;
}

// Re-export primary types for convenience
pub use crate::core::config::ScanConfig;
pub use crate::core::errors::{Result, ResultExt, TodoMdError};
pub use crate::core::pipeline::{ReportItem, ScanOutcome, ScanPipeline};
pub use crate::io::reports::{ReportFormat, ReportWriter};
pub use crate::lang::markers::{ExtractionPolicy, MarkerExtractor, MarkerRecord};
pub use crate::lang::scope::{ScopeMap, ScopeResolver, ScopeStrategy, MODULE_SCOPE};
