//! Reconciliation summary types
//!
//! Provides structures for tracking results per Terraform file and overall.

use super::{ReconcileResult, SkipReason};
use crate::version::Action;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An update that could not be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpdate {
    /// Position of the update in `FileReconcileResult::results`
    pub index: usize,
    pub message: String,
}

/// Reconciliation results for a single Terraform file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReconcileResult {
    /// Path to the Terraform file
    pub path: PathBuf,
    /// Individual dependency results, in declaration order
    pub results: Vec<ReconcileResult>,
    /// Whether the file was actually rewritten
    pub modified: bool,
}

impl FileReconcileResult {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            results: Vec::new(),
            modified: false,
        }
    }

    pub fn add_result(&mut self, result: ReconcileResult) {
        self.results.push(result);
    }

    /// Returns all updates
    pub fn updates(&self) -> impl Iterator<Item = &ReconcileResult> {
        self.results.iter().filter(|r| r.is_update())
    }

    /// Turns the updates at the given indices into `RewriteFailed` skips
    pub fn mark_rewrite_failures(&mut self, failed: &[FailedUpdate]) {
        for failure in failed {
            let Some(slot) = self.results.get_mut(failure.index) else {
                continue;
            };
            if slot.is_update() {
                let record = slot.record().clone();
                *slot = ReconcileResult::skip(
                    record,
                    SkipReason::RewriteFailed(failure.message.clone()),
                );
            }
        }
    }

    /// Returns true if any dependency in this file needs rewriting
    pub fn has_updates(&self) -> bool {
        self.results.iter().any(|r| r.is_update())
    }
}

/// Overall summary of a plan or apply run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    /// Results for each Terraform file processed
    pub files: Vec<FileReconcileResult>,
    /// Whether updates were written to disk
    pub apply: bool,
}

impl ReconcileSummary {
    pub fn new(apply: bool) -> Self {
        Self {
            files: Vec::new(),
            apply,
        }
    }

    pub fn add_file(&mut self, file: FileReconcileResult) {
        self.files.push(file);
    }

    /// Returns every result across all files
    pub fn all_results(&self) -> impl Iterator<Item = &ReconcileResult> {
        self.files.iter().flat_map(|f| f.results.iter())
    }

    /// Returns all updates across all files
    pub fn all_updates(&self) -> impl Iterator<Item = &ReconcileResult> {
        self.files.iter().flat_map(|f| f.updates())
    }

    /// Number of updates that raise the declared version
    pub fn upgraded(&self) -> usize {
        self.all_updates()
            .filter(|r| r.direction() == Action::Upgrade)
            .count()
    }

    /// Number of updates that lower the declared version
    pub fn downgraded(&self) -> usize {
        self.all_updates()
            .filter(|r| r.direction() == Action::Downgrade)
            .count()
    }

    /// Number of evaluated dependencies left as declared
    pub fn unchanged(&self) -> usize {
        self.all_results().filter(|r| r.is_unchanged()).count()
    }

    /// Number of dependencies whose versions could not be retrieved
    pub fn fetch_failures(&self) -> usize {
        self.all_results().filter(|r| r.is_fetch_failure()).count()
    }

    /// Number of dependencies skipped for any other reason
    pub fn skipped(&self) -> usize {
        self.all_results()
            .filter(|r| r.is_skip() && !r.is_fetch_failure())
            .count()
    }

    /// Total number of pending or applied updates
    pub fn total_updates(&self) -> usize {
        self.all_updates().count()
    }

    /// Total number of dependencies seen
    pub fn total_dependencies(&self) -> usize {
        self.files.iter().map(|f| f.results.len()).sum()
    }

    pub fn files_modified(&self) -> usize {
        self.files.iter().filter(|f| f.modified).count()
    }

    pub fn has_changes(&self) -> bool {
        self.total_updates() > 0
    }
}

impl Default for ReconcileSummary {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyRecord, Evaluation, SkipReason, TargetKind};
    use crate::version::Status;

    fn record(name: &str, version: &str) -> DependencyRecord {
        DependencyRecord::new(
            TargetKind::Provider,
            name,
            format!("hashicorp/{}", name),
            version,
            "",
            "/infra/main.tf",
        )
    }

    fn eval(status: Status) -> Evaluation {
        Evaluation::new(Some("2.0.0".into()), Some("2.0.0".into()), status)
    }

    fn sample_upgrade(name: &str) -> ReconcileResult {
        ReconcileResult::update(
            record(name, "1.0.0"),
            "2.0.0",
            eval(Status::UpgradeToAvailable),
        )
    }

    fn sample_downgrade(name: &str) -> ReconcileResult {
        ReconcileResult::update(
            record(name, "3.0.0"),
            "2.0.0",
            eval(Status::DowngradeToAvailable),
        )
    }

    fn sample_unchanged(name: &str) -> ReconcileResult {
        ReconcileResult::unchanged(record(name, "2.0.0"), eval(Status::UpToDate))
    }

    #[test]
    fn test_file_result_new() {
        let result = FileReconcileResult::new("/infra/main.tf");
        assert_eq!(result.path, PathBuf::from("/infra/main.tf"));
        assert!(result.results.is_empty());
        assert!(!result.modified);
        assert!(!result.has_updates());
    }

    #[test]
    fn test_file_result_updates_iterator() {
        let mut result = FileReconcileResult::new("/infra/main.tf");
        result.add_result(sample_upgrade("aws"));
        result.add_result(sample_unchanged("google"));

        let updates: Vec<_> = result.updates().collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].record().name, "aws");
        assert!(result.has_updates());
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = ReconcileSummary::new(false);

        let mut main = FileReconcileResult::new("/infra/main.tf");
        main.add_result(sample_upgrade("aws"));
        main.add_result(sample_downgrade("google"));
        main.add_result(sample_unchanged("azurerm"));
        summary.add_file(main);

        let mut versions = FileReconcileResult::new("/infra/versions.tf");
        versions.add_result(ReconcileResult::skip_fetch_failed(
            record("random", "3.0.0"),
            "HTTP 500",
        ));
        versions.add_result(ReconcileResult::skip(
            record("null", "3.0.0"),
            SkipReason::NotTargeted,
        ));
        summary.add_file(versions);

        assert_eq!(summary.upgraded(), 1);
        assert_eq!(summary.downgraded(), 1);
        assert_eq!(summary.unchanged(), 1);
        assert_eq!(summary.fetch_failures(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.total_updates(), 2);
        assert_eq!(summary.total_dependencies(), 5);
        assert!(summary.has_changes());
    }

    #[test]
    fn test_mark_rewrite_failures() {
        let mut file = FileReconcileResult::new("/infra/main.tf");
        file.add_result(sample_upgrade("aws"));
        file.add_result(sample_unchanged("google"));
        file.add_result(sample_downgrade("azurerm"));

        file.mark_rewrite_failures(&[
            FailedUpdate {
                index: 0,
                message: "declaration not found".to_string(),
            },
            FailedUpdate {
                index: 1,
                message: "ignored".to_string(),
            },
            FailedUpdate {
                index: 7,
                message: "out of range".to_string(),
            },
        ]);

        assert!(matches!(
            &file.results[0],
            ReconcileResult::Skip {
                reason: SkipReason::RewriteFailed(message),
                ..
            } if message == "declaration not found"
        ));
        assert!(file.results[1].is_unchanged());
        assert!(file.results[2].is_update());

        let mut summary = ReconcileSummary::new(true);
        summary.add_file(file);
        assert_eq!(summary.upgraded(), 0);
        assert_eq!(summary.downgraded(), 1);
        assert_eq!(summary.skipped(), 1);
    }

    #[test]
    fn test_summary_default() {
        let summary = ReconcileSummary::default();
        assert!(summary.files.is_empty());
        assert!(!summary.apply);
        assert!(!summary.has_changes());
    }

    #[test]
    fn test_serde_summary() {
        let mut summary = ReconcileSummary::new(true);
        let mut file = FileReconcileResult::new("/infra/main.tf");
        file.add_result(sample_upgrade("aws"));
        summary.add_file(file);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"apply\":true"));
        let parsed: ReconcileSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }
}
