//! Source file discovery.
//!
//! Walks a root recursively and keeps files whose extension is in the
//! configured allow-list. Results come back in walk order; they are not
//! sorted.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::config::ScanConfig;
use crate::core::errors::Result;
use crate::core::file_utils::FileReader;

/// Discover scannable files under `root`.
///
/// A root that is itself a file is returned if its extension is allowed. A
/// root that does not exist yields no files.
pub fn discover_files(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let excludes = compile_globset(&config.exclude_patterns)?;

    if root.is_file() {
        let keep = is_allowed(root, config) && !is_excluded(root, root, excludes.as_ref());
        return Ok(if keep { vec![root.to_path_buf()] } else { Vec::new() });
    }

    let walker = WalkDir::new(root)
        .follow_links(config.follow_links)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !is_excluded(entry.path(), root, excludes.as_ref())
        });

    let mut collected = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Failed to walk directory: {err}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if is_allowed(path, config) {
            collected.push(path.to_path_buf());
        } else {
            debug!("Skipping {} (extension not scanned)", path.display());
        }
    }

    info!(
        "File discovery completed: {} files selected under {}",
        collected.len(),
        root.display()
    );
    Ok(collected)
}

fn is_allowed(path: &Path, config: &ScanConfig) -> bool {
    FileReader::extension(path).is_some_and(|ext| config.allows_extension(ext))
}

fn is_excluded(path: &Path, root: &Path, excludes: Option<&GlobSet>) -> bool {
    let Some(globset) = excludes else {
        return false;
    };
    let relative = path.strip_prefix(root).unwrap_or(path);
    globset.is_match(relative) || globset.is_match(path)
}

fn compile_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(Some(builder.build()?))
}
