//! Plan/apply orchestrator
//!
//! Workflow: detect → extract → fetch → judge → rewrite
//!
//! Records are processed one at a time. A failure on one record (retrieval,
//! constraint evaluation, rewrite) is collected and the run continues.

use crate::domain::{
    DependencyRecord, FileReconcileResult, ReconcileResult, ReconcileSummary, SkipReason,
    TargetKind,
};
use crate::error::ScanError;
use crate::progress::Progress;
use crate::registry::VersionSource;
use crate::terraform::{
    detect_terraform_files, extract_dependencies, read_terraform_file, TerraformWriter,
    WriteResult, DEFAULT_PATTERN,
};
use crate::update::{UpdateFilter, UpdateJudge};
use std::collections::HashMap;
use std::path::PathBuf;

/// Settings for one plan or apply run
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Directory containing the Terraform files
    pub path: PathBuf,
    /// Glob pattern for Terraform files
    pub pattern: String,
    /// Write updates to disk (apply) instead of only reporting them (plan)
    pub apply: bool,
    pub filter: UpdateFilter,
    pub show_progress: bool,
}

impl OrchestratorConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pattern: DEFAULT_PATTERN.to_string(),
            apply: false,
            filter: UpdateFilter::new(),
            show_progress: false,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_apply(mut self, apply: bool) -> Self {
        self.apply = apply;
        self
    }

    pub fn with_filter(mut self, filter: UpdateFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Reconciliation summary with all results
    pub summary: ReconcileSummary,
    /// Write results for each file with updates
    pub write_results: Vec<WriteResult>,
    /// Per-record errors encountered during processing
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Errors that do not stop a run
#[derive(Debug)]
pub enum OrchestratorError {
    /// Failed to read a Terraform file
    ReadError { path: String, message: String },
    /// Failed to fetch available versions
    RegistryError { name: String, message: String },
    /// Declared constraint could not be evaluated
    ConstraintError { name: String, message: String },
    /// Failed to rewrite or write a file
    WriteError { path: String, message: String },
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::ReadError { path, message } => {
                write!(f, "Failed to read {}: {}", path, message)
            }
            OrchestratorError::RegistryError { name, message } => {
                write!(f, "Failed to fetch versions for {}: {}", name, message)
            }
            OrchestratorError::ConstraintError { name, message } => {
                write!(f, "Failed to evaluate constraint for {}: {}", name, message)
            }
            OrchestratorError::WriteError { path, message } => {
                write!(f, "Failed to write {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for OrchestratorError {}

/// Orchestrator for plan and apply runs
pub struct Orchestrator {
    config: OrchestratorConfig,
    source: Box<dyn VersionSource>,
}

impl Orchestrator {
    pub fn new(config: OrchestratorConfig, source: Box<dyn VersionSource>) -> Self {
        Self { config, source }
    }

    /// Run the workflow
    ///
    /// Only a failure to list the directory is returned as an error; every
    /// other failure is collected in the result.
    pub async fn run(&self) -> Result<OrchestratorResult, ScanError> {
        let mut progress = Progress::new(self.config.show_progress);
        let mut summary = ReconcileSummary::new(self.config.apply);
        let mut errors = Vec::new();

        progress.spinner("Detecting Terraform files...");
        let files = detect_terraform_files(&self.config.path, &self.config.pattern);
        progress.finish_and_clear();
        let files = files?;

        if files.is_empty() {
            tracing::info!(path = %self.config.path.display(), "No Terraform files found");
            return Ok(OrchestratorResult {
                summary,
                write_results: Vec::new(),
                errors,
            });
        }

        progress.spinner("Extracting dependencies...");
        let mut extracted = Vec::new();
        for path in &files {
            match read_terraform_file(path) {
                Ok(content) => extracted.push((path, extract_dependencies(path, &content))),
                Err(e) => errors.push(OrchestratorError::ReadError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }),
            }
        }
        progress.finish_and_clear();

        let total: usize = extracted.iter().map(|(_, records)| records.len()).sum();
        let judge = UpdateJudge::new(self.config.filter.clone());
        let mut fetched: HashMap<(TargetKind, String), Vec<String>> = HashMap::new();

        progress.start(total as u64, "Checking dependencies");
        for (path, records) in extracted {
            let mut file_result = FileReconcileResult::new(path);

            for record in records {
                progress.set_message(&format!("Checking {}", record.name));
                let result = self
                    .reconcile(&judge, record, &mut fetched, &mut errors)
                    .await;
                file_result.add_result(result);
                progress.inc();
            }

            summary.add_file(file_result);
        }
        progress.finish_and_clear();

        if self.config.apply {
            progress.spinner("Writing updates...");
        }
        let writer = TerraformWriter::new(!self.config.apply);
        let write_results = writer.apply_all_updates(&summary.files);
        progress.finish_and_clear();

        for result in &write_results {
            if let Some(file) = summary.files.iter_mut().find(|f| f.path == result.path) {
                file.modified = result.file_modified;
                file.mark_rewrite_failures(&result.failed);
            }
            for error in &result.errors {
                errors.push(OrchestratorError::WriteError {
                    path: result.path.display().to_string(),
                    message: error.clone(),
                });
            }
        }

        tracing::info!(
            upgraded = summary.upgraded(),
            downgraded = summary.downgraded(),
            unchanged = summary.unchanged(),
            failures = summary.fetch_failures(),
            apply = self.config.apply,
            "Reconciliation finished"
        );

        Ok(OrchestratorResult {
            summary,
            write_results,
            errors,
        })
    }

    async fn reconcile(
        &self,
        judge: &UpdateJudge,
        record: DependencyRecord,
        fetched: &mut HashMap<(TargetKind, String), Vec<String>>,
        errors: &mut Vec<OrchestratorError>,
    ) -> ReconcileResult {
        if let Some(reason) = judge.should_skip(&record) {
            return ReconcileResult::skip(record, reason);
        }

        let key = (record.kind, record.source.clone());
        if !fetched.contains_key(&key) {
            match self.source.fetch_versions(&record).await {
                Ok(versions) => {
                    fetched.insert(key.clone(), versions);
                }
                Err(e) => {
                    tracing::warn!(name = %record.name, error = %e, "Failed to fetch versions");
                    errors.push(OrchestratorError::RegistryError {
                        name: record.name.clone(),
                        message: e.to_string(),
                    });
                    return ReconcileResult::skip_fetch_failed(record, e.to_string());
                }
            }
        }

        let available = fetched.get(&key).map(Vec::as_slice).unwrap_or_default();
        let result = judge.judge(&record, available);

        if let ReconcileResult::Skip {
            reason: SkipReason::InvalidConstraint(message),
            ..
        } = &result
        {
            errors.push(OrchestratorError::ConstraintError {
                name: record.name.clone(),
                message: message.clone(),
            });
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyKey, Target};
    use crate::error::RegistryError;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    const MAIN_TF: &str = r#"terraform {
  required_providers {
    aws = {
      source  = "hashicorp/aws"
      version = "4.0.0" # ~> 4.0
    }
    google = {
      source  = "hashicorp/google"
      version = "5.0.0"
    }
  }
}

module "vpc" {
  source  = "terraform-aws-modules/vpc/aws"
  version = "6.0.0" # < 6.0.0
}
"#;

    struct FakeSource {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl VersionSource for FakeSource {
        async fn fetch_versions(
            &self,
            record: &DependencyRecord,
        ) -> Result<Vec<String>, RegistryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let versions: &[&str] = match record.source.as_str() {
                "hashicorp/aws" => &["4.0.0", "4.67.0", "5.0.0"],
                "terraform-aws-modules/vpc/aws" => &["5.1.0", "6.0.0"],
                _ => {
                    return Err(RegistryError::package_not_found(
                        &record.source,
                        "Terraform provider registry",
                    ))
                }
            };
            Ok(versions.iter().map(|v| v.to_string()).collect())
        }
    }

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.tf"), MAIN_TF).unwrap();
        dir
    }

    fn orchestrator(config: OrchestratorConfig) -> (Orchestrator, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FakeSource {
            calls: calls.clone(),
        };
        (Orchestrator::new(config, Box::new(source)), calls)
    }

    #[test]
    fn test_orchestrator_config_builders() {
        let config = OrchestratorConfig::new("/infra")
            .with_pattern("*.tf.json")
            .with_apply(true)
            .with_progress(true);
        assert_eq!(config.path, PathBuf::from("/infra"));
        assert_eq!(config.pattern, "*.tf.json");
        assert!(config.apply);
        assert!(config.show_progress);
    }

    #[tokio::test]
    async fn test_plan_does_not_write() {
        let dir = setup();
        let (orchestrator, _) = orchestrator(OrchestratorConfig::new(dir.path()));
        let result = orchestrator.run().await.unwrap();

        assert_eq!(result.summary.upgraded(), 1);
        assert_eq!(result.summary.downgraded(), 1);
        assert_eq!(result.summary.fetch_failures(), 1);
        assert_eq!(result.summary.files_modified(), 0);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("main.tf")).unwrap(),
            MAIN_TF
        );
    }

    #[tokio::test]
    async fn test_apply_writes_updates() {
        let dir = setup();
        let (orchestrator, _) =
            orchestrator(OrchestratorConfig::new(dir.path()).with_apply(true));
        let result = orchestrator.run().await.unwrap();

        assert_eq!(result.summary.files_modified(), 1);
        assert!(result.summary.files[0].modified);
        let written = fs::read_to_string(dir.path().join("main.tf")).unwrap();
        assert!(written.contains("version = \"4.67.0\" # ~> 4.0"));
        assert!(written.contains("version = \"5.1.0\" # < 6.0.0"));
        assert!(written.contains("version = \"5.0.0\"\n"));
    }

    #[tokio::test]
    async fn test_targets_filter() {
        let dir = setup();
        let filter =
            UpdateFilter::new().with_targets(vec![DependencyKey::new(Target::Provider, "aws")]);
        let (orchestrator, calls) =
            orchestrator(OrchestratorConfig::new(dir.path()).with_filter(filter));
        let result = orchestrator.run().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.summary.upgraded(), 1);
        let not_targeted = result
            .summary
            .all_results()
            .filter(|r| {
                matches!(
                    r,
                    ReconcileResult::Skip {
                        reason: SkipReason::NotTargeted,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(not_targeted, 2);
        assert!(!result.has_errors());
    }

    #[tokio::test]
    async fn test_same_source_fetched_once() {
        let dir = setup();
        fs::write(
            dir.path().join("other.tf"),
            "module \"vpc2\" {\n  source  = \"terraform-aws-modules/vpc/aws\"\n  version = \"5.1.0\"\n}\n",
        )
        .unwrap();
        let (orchestrator, calls) = orchestrator(OrchestratorConfig::new(dir.path()));
        let result = orchestrator.run().await.unwrap();

        assert_eq!(result.summary.files.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    /// Edits the file on the first fetch, so the aws declaration goes stale
    struct EditingSource {
        inner: FakeSource,
        path: PathBuf,
    }

    #[async_trait]
    impl VersionSource for EditingSource {
        async fn fetch_versions(
            &self,
            record: &DependencyRecord,
        ) -> Result<Vec<String>, RegistryError> {
            let content = fs::read_to_string(&self.path).unwrap();
            let edited = content.replace("\"4.0.0\" # ~> 4.0", "\"4.0.1\" # ~> 4.0");
            fs::write(&self.path, edited).unwrap();
            self.inner.fetch_versions(record).await
        }
    }

    #[tokio::test]
    async fn test_failed_rewrite_is_not_counted() {
        let dir = setup();
        let path = dir.path().join("main.tf");
        let source = EditingSource {
            inner: FakeSource {
                calls: Arc::new(AtomicUsize::new(0)),
            },
            path: path.clone(),
        };
        let config = OrchestratorConfig::new(dir.path()).with_apply(true);
        let result = Orchestrator::new(config, Box::new(source))
            .run()
            .await
            .unwrap();

        assert_eq!(result.summary.upgraded(), 0);
        assert_eq!(result.summary.downgraded(), 1);
        assert_eq!(result.summary.skipped(), 1);
        let aws = result
            .summary
            .all_results()
            .find(|r| r.record().name == "aws")
            .unwrap();
        assert!(matches!(
            aws,
            ReconcileResult::Skip {
                reason: SkipReason::RewriteFailed(_),
                ..
            }
        ));
        assert!(result
            .errors
            .iter()
            .any(|e| matches!(e, OrchestratorError::WriteError { .. })));

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("version = \"4.0.1\" # ~> 4.0"));
        assert!(written.contains("version = \"5.1.0\" # < 6.0.0"));
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let (orchestrator, calls) = orchestrator(OrchestratorConfig::new(dir.path()));
        let result = orchestrator.run().await.unwrap();

        assert!(result.summary.files.is_empty());
        assert!(!result.summary.has_changes());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let (orchestrator, _) = orchestrator(OrchestratorConfig::new(dir.path().join("nope")));
        assert!(matches!(
            orchestrator.run().await,
            Err(ScanError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_orchestrator_error_display() {
        let err = OrchestratorError::RegistryError {
            name: "aws".to_string(),
            message: "not found".to_string(),
        };
        assert!(err.to_string().contains("Failed to fetch versions for aws"));

        let err = OrchestratorError::ConstraintError {
            name: "vpc".to_string(),
            message: "bad shape".to_string(),
        };
        assert!(err.to_string().contains("Failed to evaluate constraint for vpc"));

        let err = OrchestratorError::WriteError {
            path: "/infra/main.tf".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("Failed to write"));

        let err = OrchestratorError::ReadError {
            path: "/infra/main.tf".to_string(),
            message: "denied".to_string(),
        };
        assert!(err.to_string().contains("Failed to read"));
    }
}
