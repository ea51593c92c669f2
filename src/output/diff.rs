//! Diff output formatter for showing changes
//!
//! Each pending update becomes a hunk with the declaration lines before and
//! after the version rewrite.

use crate::domain::{FileReconcileResult, ReconcileResult, ReconcileSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::OutputFormatter;
use crate::terraform::{rewrite_span, Attribute};
use crate::update::SetOutcome;
use std::io::Write;

/// Diff formatter for showing version changes
pub struct DiffFormatter {
    /// Whether updates were written
    apply: bool,
}

impl DiffFormatter {
    pub fn new(apply: bool) -> Self {
        Self { apply }
    }

    fn write_hunk(
        &self,
        name: &str,
        old_code: &str,
        new_code: &str,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(writer, "@@ {} @@", name)?;
        for (old, new) in old_code.lines().zip(new_code.lines()) {
            if old != new {
                writeln!(writer, "-{}", old)?;
                writeln!(writer, "+{}", new)?;
            }
        }
        Ok(())
    }
}

impl OutputFormatter for DiffFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        for file in &result.summary.files {
            if !file.has_updates() {
                continue;
            }
            self.format_file(file, writer)?;
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &ReconcileSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let verb = if self.apply { "updated" } else { "would be updated" };
        writeln!(
            writer,
            "# {} dependency version(s) {} ({} up, {} down)",
            summary.total_updates(),
            verb,
            summary.upgraded(),
            summary.downgraded()
        )
    }

    fn format_file(
        &self,
        file: &FileReconcileResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if !file.has_updates() {
            return Ok(());
        }

        writeln!(writer, "--- a/{}", file.path.display())?;
        writeln!(writer, "+++ b/{}", file.path.display())?;

        for result in file.updates() {
            if let ReconcileResult::Update {
                record,
                new_version,
                ..
            } = result
            {
                match rewrite_span(&record.code, Attribute::Version, new_version) {
                    Ok(new_code) => self.write_hunk(&record.name, &record.code, &new_code, writer)?,
                    Err(e) => writeln!(writer, "# {}: {}", record.name, e)?,
                }
            }
        }

        Ok(())
    }

    fn format_set(&self, outcome: &SetOutcome, writer: &mut dyn Write) -> std::io::Result<()> {
        if !outcome.is_change() {
            return Ok(());
        }

        writeln!(writer, "--- a/{}", outcome.file_path.display())?;
        writeln!(writer, "+++ b/{}", outcome.file_path.display())?;
        self.write_hunk(&outcome.name, &outcome.old_code, &outcome.new_code, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyRecord, Evaluation, Target, TargetKind};
    use crate::version::Status;
    use std::path::PathBuf;

    const PROVIDER_CODE: &str =
        "aws = {\n      source  = \"hashicorp/aws\"\n      version = \"5.0.0\" # ~> 5.0";

    fn create_test_result() -> OrchestratorResult {
        let record = DependencyRecord::new(
            TargetKind::Provider,
            "aws",
            "hashicorp/aws",
            "5.0.0",
            PROVIDER_CODE,
            "versions.tf",
        );
        let mut file = FileReconcileResult::new(PathBuf::from("versions.tf"));
        file.add_result(ReconcileResult::update(
            record,
            "5.1.0",
            Evaluation::new(
                Some("6.0.0".into()),
                Some("5.1.0".into()),
                Status::UpgradeToAllowed,
            ),
        ));

        let mut summary = ReconcileSummary::new(false);
        summary.add_file(file);
        OrchestratorResult {
            summary,
            write_results: Vec::new(),
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_format_diff() {
        let formatter = DiffFormatter::new(false);
        let mut output = Vec::new();
        formatter.format(&create_test_result(), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("--- a/versions.tf"));
        assert!(output.contains("+++ b/versions.tf"));
        assert!(output.contains("@@ aws @@"));
        assert!(output.contains("-      version = \"5.0.0\" # ~> 5.0"));
        assert!(output.contains("+      version = \"5.1.0\" # ~> 5.0"));
        assert!(!output.contains("-      source"));
        assert!(output.contains("# 1 dependency version(s) would be updated (1 up, 0 down)"));
    }

    #[test]
    fn test_format_diff_skips_files_without_updates() {
        let formatter = DiffFormatter::new(true);
        let mut output = Vec::new();
        formatter
            .format_file(&FileReconcileResult::new("main.tf"), &mut output)
            .unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_format_set_diff() {
        let outcome = SetOutcome {
            name: "aws".to_string(),
            target: Target::Provider,
            attribute: Attribute::Constraint,
            file_path: PathBuf::from("versions.tf"),
            old_value: "~> 5.0".to_string(),
            new_value: "~> 6.0".to_string(),
            old_code: "version = \"5.0.0\" # ~> 5.0".to_string(),
            new_code: "version = \"5.0.0\" # ~> 6.0".to_string(),
            written: true,
        };

        let formatter = DiffFormatter::new(true);
        let mut output = Vec::new();
        formatter.format_set(&outcome, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("@@ aws @@"));
        assert!(output.contains("-version = \"5.0.0\" # ~> 5.0"));
        assert!(output.contains("+version = \"5.0.0\" # ~> 6.0"));
    }
}
