//! File reading helpers.
//!
//! Sources are read whole and must be valid UTF-8. There is no lossy fallback:
//! a file that does not decode contributes nothing to a scan.

use std::fs;
use std::path::Path;

use crate::core::errors::{Result, TodoMdError};

/// Whole-file UTF-8 reader
pub struct FileReader;

impl FileReader {
    /// Read a file to a string, rejecting content that is not UTF-8.
    pub fn read_to_string(file_path: &Path) -> Result<String> {
        let bytes = fs::read(file_path).map_err(|e| {
            TodoMdError::io(format!("Failed to read {}", file_path.display()), e)
        })?;

        String::from_utf8(bytes).map_err(|e| TodoMdError::Validation {
            message: format!(
                "{} is not valid UTF-8 (invalid byte at offset {})",
                file_path.display(),
                e.utf8_error().valid_up_to()
            ),
            field: None,
            expected: Some("UTF-8".to_string()),
            actual: None,
        })
    }

    /// Extension of `file_path` as written, without the dot.
    pub fn extension(file_path: &Path) -> Option<&str> {
        file_path.extension().and_then(|ext| ext.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reads_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.py");
        fs::write(&path, "# TODO: é\n").unwrap();
        assert_eq!(FileReader::read_to_string(&path).unwrap(), "# TODO: é\n");
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.c");
        fs::write(&path, [b'/', b'/', b' ', 0xE9, b'\n']).unwrap();
        let err = FileReader::read_to_string(&path).unwrap_err();
        assert!(matches!(err, TodoMdError::Validation { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FileReader::read_to_string(Path::new("/no/such/file.py")).unwrap_err();
        assert!(matches!(err, TodoMdError::Io { .. }));
    }

    #[test]
    fn test_extension() {
        assert_eq!(FileReader::extension(Path::new("Lib.HS")), Some("HS"));
        assert_eq!(FileReader::extension(Path::new("pkg/mod.py")), Some("py"));
        assert_eq!(FileReader::extension(Path::new("Makefile")), None);
    }
}
