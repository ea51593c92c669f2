//! Terraform file detection
//!
//! Matches a glob pattern (default `*.tf`) inside a single directory.
//! Subdirectories are not searched.

use crate::error::ScanError;
use std::path::{Path, PathBuf};

/// Default pattern for Terraform files
pub const DEFAULT_PATTERN: &str = "*.tf";

/// Detect Terraform files in `dir` matching `pattern`
///
/// Only regular files are returned, sorted by path.
pub fn detect_terraform_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::directory_not_found(dir));
    }

    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let full_pattern = format!("{}/{}", escaped_dir.trim_end_matches('/'), pattern);

    let entries = glob::glob(&full_pattern).map_err(|e| ScanError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable path");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();

    files.sort();
    tracing::debug!(dir = %dir.display(), pattern, count = files.len(), "Detected Terraform files");

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    #[test]
    fn test_detect_tf_files() {
        let dir = setup_test_dir();
        fs::write(dir.path().join("main.tf"), "").unwrap();
        fs::write(dir.path().join("versions.tf"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let files = detect_terraform_files(dir.path(), DEFAULT_PATTERN).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0], dir.path().join("main.tf"));
        assert_eq!(files[1], dir.path().join("versions.tf"));
    }

    #[test]
    fn test_detect_is_not_recursive() {
        let dir = setup_test_dir();
        fs::create_dir(dir.path().join("modules")).unwrap();
        fs::write(dir.path().join("modules").join("nested.tf"), "").unwrap();
        fs::write(dir.path().join("main.tf"), "").unwrap();

        let files = detect_terraform_files(dir.path(), DEFAULT_PATTERN).unwrap();
        assert_eq!(files, vec![dir.path().join("main.tf")]);
    }

    #[test]
    fn test_detect_skips_directories() {
        let dir = setup_test_dir();
        fs::create_dir(dir.path().join("weird.tf")).unwrap();

        let files = detect_terraform_files(dir.path(), DEFAULT_PATTERN).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_detect_custom_pattern() {
        let dir = setup_test_dir();
        fs::write(dir.path().join("main.tf"), "").unwrap();
        fs::write(dir.path().join("providers.tf"), "").unwrap();

        let files = detect_terraform_files(dir.path(), "prov*.tf").unwrap();
        assert_eq!(files, vec![dir.path().join("providers.tf")]);
    }

    #[test]
    fn test_detect_missing_directory() {
        let dir = setup_test_dir();
        let missing = dir.path().join("nope");
        let err = detect_terraform_files(&missing, DEFAULT_PATTERN).unwrap_err();
        assert!(matches!(err, ScanError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_detect_invalid_pattern() {
        let dir = setup_test_dir();
        let err = detect_terraform_files(dir.path(), "[").unwrap_err();
        assert!(matches!(err, ScanError::InvalidPattern { .. }));
    }
}
