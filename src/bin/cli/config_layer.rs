//! Configuration Layer Management
//!
//! Builds the effective [`ScanConfig`] from three layers, later layers winning:
//! built-in defaults (or the legacy preset), a YAML file, then CLI flags.

use std::path::PathBuf;

use anyhow::Context;
use todo_md::{ExtractionPolicy, ScanConfig};

use crate::cli::args::ScanArgs;

/// Config files picked up from the working directory when `--config` is absent.
const IMPLICIT_CONFIG_FILES: &[&str] = &[".todo-md.yml", ".todo-md.yaml"];

/// Trait for merging configuration layers
pub trait ConfigMerge<T> {
    /// Merge another layer into this one, with the other taking priority
    fn merge_with(&mut self, other: T);
}

impl ConfigMerge<&ScanArgs> for ScanConfig {
    fn merge_with(&mut self, args: &ScanArgs) {
        if args.legacy {
            self.extraction = ExtractionPolicy::Line;
            self.resolve_scopes = false;
        }
        if args.no_context {
            self.resolve_scopes = false;
        }

        for marker in &args.markers {
            if !self.markers.iter().any(|m| m.eq_ignore_ascii_case(marker)) {
                self.markers.push(marker.clone());
            }
        }
        for ext in &args.extensions {
            if !self.allows_extension(ext) {
                self.extensions.push(ext.trim_start_matches('.').to_string());
            }
        }
        self.exclude_patterns.extend(args.exclude.iter().cloned());
    }
}

/// Layered configuration loading for `scan`
pub fn build_scan_config(args: &ScanArgs) -> anyhow::Result<ScanConfig> {
    let implicit_config_path = if args.config.is_none() {
        IMPLICIT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    } else {
        None
    };

    let mut config = match args.config.as_ref().or(implicit_config_path.as_ref()) {
        Some(path) => ScanConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None if args.legacy => ScanConfig::legacy(),
        None => ScanConfig::default(),
    };

    config.merge_with(args);

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::OutputFormat;
    use tempfile::tempdir;

    fn args(directory: &str) -> ScanArgs {
        ScanArgs {
            directory: PathBuf::from(directory),
            output: None,
            config: None,
            legacy: false,
            no_context: false,
            format: OutputFormat::Markdown,
            markers: Vec::new(),
            extensions: Vec::new(),
            exclude: Vec::new(),
        }
    }

    #[test]
    fn test_cli_flags_override_defaults() {
        let mut scan = args(".");
        scan.no_context = true;
        scan.markers = vec!["hack".to_string(), "todo".to_string()];
        scan.extensions = vec![".rs".to_string(), "py".to_string()];

        let mut config = ScanConfig::default();
        config.merge_with(&scan);

        assert!(!config.resolve_scopes);
        assert_eq!(config.markers, vec!["TODO", "FIXME", "hack"]);
        assert!(config.allows_extension("rs"));
        assert_eq!(config.extensions.iter().filter(|e| *e == "py").count(), 1);
    }

    #[test]
    fn test_legacy_flag_switches_policy() {
        let mut scan = args(".");
        scan.legacy = true;
        let mut config = ScanConfig::default();
        config.merge_with(&scan);
        assert_eq!(config.extraction, ExtractionPolicy::Line);
        assert!(!config.resolve_scopes);
    }

    #[test]
    fn test_explicit_config_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.yml");
        std::fs::write(&path, "markers: [XXX]\nresolve_scopes: false\n").unwrap();

        let mut scan = args(".");
        scan.config = Some(path);
        let config = build_scan_config(&scan).unwrap();
        assert_eq!(config.markers, vec!["XXX"]);
        assert!(!config.resolve_scopes);
    }

    #[test]
    fn test_invalid_config_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "markers: []\n").unwrap();

        let mut scan = args(".");
        scan.config = Some(path);
        assert!(build_scan_config(&scan).is_err());
    }
}
