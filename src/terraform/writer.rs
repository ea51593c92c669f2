//! Terraform file reading and writing
//!
//! Provides:
//! - TerraformWriter for applying planned version changes to a file
//! - Dry-run mode support (no actual file modifications)
//! - Per-declaration error isolation, so one failed rewrite never blocks the rest

use super::rewrite::{rewrite, Attribute};
use crate::domain::{FailedUpdate, FileReconcileResult, ReconcileResult};
use crate::error::ScanError;
use std::fs;
use std::path::{Path, PathBuf};

/// Writer that applies reconciliation updates to Terraform files
pub struct TerraformWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of applying updates to a Terraform file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the Terraform file
    pub path: PathBuf,
    /// Number of updates successfully applied
    pub updates_applied: usize,
    /// Number of updates that failed
    pub updates_failed: usize,
    /// Whether the file was actually modified
    pub file_modified: bool,
    /// Errors encountered during update
    pub errors: Vec<String>,
    /// Updates left unapplied, by result index
    pub failed: Vec<FailedUpdate>,
}

impl WriteResult {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            updates_applied: 0,
            updates_failed: 0,
            file_modified: false,
            errors: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Returns true if any updates were successfully applied
    pub fn has_updates(&self) -> bool {
        self.updates_applied > 0
    }

    /// Returns true if any errors occurred
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl TerraformWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Create a TerraformWriter in dry-run mode
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Apply every Update in `file_result` to the file on disk
    ///
    /// Updates are applied in declaration order against the progressively
    /// rewritten text; the file is written once at the end.
    pub fn apply_updates(&self, file_result: &FileReconcileResult) -> Result<WriteResult, ScanError> {
        let path = &file_result.path;
        let mut result = WriteResult::new(path);

        let mut content = read_terraform_file(path)?;

        for (index, update) in file_result.results.iter().enumerate() {
            let ReconcileResult::Update {
                record,
                new_version,
                ..
            } = update
            else {
                continue;
            };

            match rewrite(&content, &record.code, Attribute::Version, new_version) {
                Ok(updated) => {
                    content = updated;
                    result.updates_applied += 1;
                }
                Err(e) => {
                    tracing::warn!(name = %record.name, error = %e, "Rewrite failed");
                    result.updates_failed += 1;
                    result
                        .errors
                        .push(format!("Failed to update {}: {}", record.name, e));
                    result.failed.push(FailedUpdate {
                        index,
                        message: e.to_string(),
                    });
                }
            }
        }

        if result.updates_applied > 0 && !self.dry_run {
            write_terraform_file(path, &content)?;
            result.file_modified = true;
            tracing::info!(path = %path.display(), updates = result.updates_applied, "Wrote file");
        }

        Ok(result)
    }

    /// Apply updates to every file that has any
    pub fn apply_all_updates(&self, files: &[FileReconcileResult]) -> Vec<WriteResult> {
        files
            .iter()
            .filter(|file| file.has_updates())
            .map(|file| match self.apply_updates(file) {
                Ok(result) => result,
                Err(e) => {
                    let mut result = WriteResult::new(&file.path);
                    result.errors.push(format!("Failed to process file: {}", e));
                    result.failed = file
                        .results
                        .iter()
                        .enumerate()
                        .filter(|(_, r)| r.is_update())
                        .map(|(index, _)| FailedUpdate {
                            index,
                            message: e.to_string(),
                        })
                        .collect();
                    result.updates_failed = result.failed.len();
                    result
                }
            })
            .collect()
    }
}

/// Read a Terraform file
pub fn read_terraform_file(path: &Path) -> Result<String, ScanError> {
    fs::read_to_string(path).map_err(|e| ScanError::read_error(path, e))
}

/// Write content to a Terraform file
pub fn write_terraform_file(path: &Path, content: &str) -> Result<(), ScanError> {
    fs::write(path, content).map_err(|e| ScanError::write_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyRecord, Evaluation, TargetKind};
    use crate::terraform::extract_dependencies;
    use crate::version::Status;
    use tempfile::TempDir;

    const CONTENT: &str = r#"module "vpc" {
  source  = "terraform-aws-modules/vpc/aws"
  version = "5.0.0" # ~> 5.0
}

module "db" {
  source  = "terraform-aws-modules/rds/aws"
  version = "6.0.0"
}
"#;

    fn setup(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.tf");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn update(record: DependencyRecord, new_version: &str) -> ReconcileResult {
        let evaluation = Evaluation::new(
            Some(new_version.to_string()),
            Some(new_version.to_string()),
            Status::UpgradeToAvailable,
        );
        ReconcileResult::update(record, new_version, evaluation)
    }

    fn file_result(path: &Path) -> FileReconcileResult {
        let records = extract_dependencies(path, &fs::read_to_string(path).unwrap());
        let mut file = FileReconcileResult::new(path);
        for record in records {
            let new_version = if record.name == "vpc" { "5.9.0" } else { "6.2.0" };
            file.add_result(update(record, new_version));
        }
        file
    }

    #[test]
    fn test_writer_new() {
        assert!(!TerraformWriter::new(false).is_dry_run());
        assert!(TerraformWriter::dry_run().is_dry_run());
    }

    #[test]
    fn test_apply_updates() {
        let (_dir, path) = setup(CONTENT);
        let result = TerraformWriter::new(false)
            .apply_updates(&file_result(&path))
            .unwrap();

        assert_eq!(result.updates_applied, 2);
        assert!(result.file_modified);
        assert!(!result.has_errors());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("version = \"5.9.0\" # ~> 5.0"));
        assert!(written.contains("version = \"6.2.0\"\n"));
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let (_dir, path) = setup(CONTENT);
        let result = TerraformWriter::dry_run()
            .apply_updates(&file_result(&path))
            .unwrap();

        assert_eq!(result.updates_applied, 2);
        assert!(!result.file_modified);
        assert_eq!(fs::read_to_string(&path).unwrap(), CONTENT);
    }

    #[test]
    fn test_failed_rewrite_is_isolated() {
        let (_dir, path) = setup(CONTENT);
        let mut file = file_result(&path);
        let stale = DependencyRecord::new(
            TargetKind::ModuleRegistry,
            "gone",
            "acme/gone/aws",
            "1.0.0",
            "module \"gone\" {",
            &path,
        );
        file.results.insert(0, update(stale, "2.0.0"));

        let result = TerraformWriter::new(false).apply_updates(&file).unwrap();
        assert_eq!(result.updates_applied, 2);
        assert_eq!(result.updates_failed, 1);
        assert!(result.errors[0].contains("gone"));
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].index, 0);
        assert!(result.failed[0].message.contains("declaration not found"));
        assert!(result.file_modified);
    }

    #[test]
    fn test_apply_all_skips_files_without_updates() {
        let (_dir, path) = setup(CONTENT);
        let empty = FileReconcileResult::new(&path);
        let results = TerraformWriter::new(false).apply_all_updates(&[empty]);
        assert!(results.is_empty());
    }

    #[test]
    fn test_apply_all_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.tf");
        let record = DependencyRecord::new(
            TargetKind::Provider,
            "aws",
            "hashicorp/aws",
            "4.0.0",
            "aws = {",
            &path,
        );
        let mut file = FileReconcileResult::new(&path);
        file.add_result(update(record, "5.0.0"));

        let results = TerraformWriter::new(false).apply_all_updates(&[file]);
        assert_eq!(results.len(), 1);
        assert!(results[0].has_errors());
        assert!(!results[0].file_modified);
        assert_eq!(results[0].updates_failed, 1);
        assert_eq!(results[0].failed[0].index, 0);
    }

    #[test]
    fn test_read_write_roundtrip() {
        let (_dir, path) = setup("");
        write_terraform_file(&path, "terraform {}\n").unwrap();
        assert_eq!(read_terraform_file(&path).unwrap(), "terraform {}\n");
    }
}
