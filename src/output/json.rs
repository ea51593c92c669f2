//! JSON output formatter for machine processing
//!
//! One object per run with summary counts, a per-file list of dependencies
//! and any per-record errors.

use crate::domain::{FileReconcileResult, ReconcileResult, ReconcileSummary, SkipReason};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use crate::update::SetOutcome;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbose output also lists untargeted dependencies
    verbosity: Verbosity,
}

impl JsonFormatter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

#[derive(Serialize)]
struct JsonOutput {
    apply: bool,
    summary: JsonSummary,
    files: Vec<JsonFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    upgraded: usize,
    downgraded: usize,
    unchanged: usize,
    fetch_failures: usize,
    skipped: usize,
    files_modified: usize,
}

#[derive(Serialize)]
struct JsonFile {
    path: String,
    modified: bool,
    dependencies: Vec<JsonDependency>,
}

#[derive(Serialize)]
struct JsonDependency {
    target: String,
    kind: String,
    name: String,
    source: String,
    current: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    constraint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_available: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_allowed: Option<String>,
    /// `action/position` symbol pair
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_version: Option<String>,
}

impl JsonFormatter {
    fn dependency_to_json(&self, result: &ReconcileResult) -> Option<JsonDependency> {
        let record = result.record();
        let mut dependency = JsonDependency {
            target: record.kind.target().to_string(),
            kind: record.kind.to_string(),
            name: record.name.clone(),
            source: record.source.clone(),
            current: record.version.clone(),
            constraint: record.constraint.clone(),
            latest_available: None,
            latest_allowed: None,
            symbol: None,
            status: String::new(),
            new_version: None,
        };

        match result {
            ReconcileResult::Skip { reason, .. } => {
                if *reason == SkipReason::NotTargeted && self.verbosity != Verbosity::Verbose {
                    return None;
                }
                dependency.status = reason.to_string();
            }
            ReconcileResult::Update {
                new_version,
                evaluation,
                ..
            } => {
                dependency.new_version = Some(new_version.clone());
                dependency.latest_available = evaluation.latest_available.clone();
                dependency.latest_allowed = evaluation.latest_allowed.clone();
                dependency.symbol = Some(evaluation.status.symbol());
                dependency.status = evaluation.status.label().to_string();
            }
            ReconcileResult::Unchanged { evaluation, .. } => {
                dependency.latest_available = evaluation.latest_available.clone();
                dependency.latest_allowed = evaluation.latest_allowed.clone();
                dependency.symbol = Some(evaluation.status.symbol());
                dependency.status = evaluation.status.label().to_string();
            }
        }

        Some(dependency)
    }

    fn file_to_json(&self, file: &FileReconcileResult) -> JsonFile {
        JsonFile {
            path: file.path.display().to_string(),
            modified: file.modified,
            dependencies: file
                .results
                .iter()
                .filter_map(|r| self.dependency_to_json(r))
                .collect(),
        }
    }

    fn summary_to_json(summary: &ReconcileSummary) -> JsonSummary {
        JsonSummary {
            upgraded: summary.upgraded(),
            downgraded: summary.downgraded(),
            unchanged: summary.unchanged(),
            fetch_failures: summary.fetch_failures(),
            skipped: summary.skipped(),
            files_modified: summary.files_modified(),
        }
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    writeln!(writer, "{}", json)
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            apply: result.summary.apply,
            summary: Self::summary_to_json(&result.summary),
            files: result
                .summary
                .files
                .iter()
                .map(|f| self.file_to_json(f))
                .collect(),
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        write_json(&output, writer)
    }

    fn format_summary(
        &self,
        summary: &ReconcileSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        write_json(&Self::summary_to_json(summary), writer)
    }

    fn format_file(
        &self,
        file: &FileReconcileResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        write_json(&self.file_to_json(file), writer)
    }

    fn format_set(&self, outcome: &SetOutcome, writer: &mut dyn Write) -> std::io::Result<()> {
        write_json(outcome, writer)
    }
}
