//! Text output formatter for human-readable display
//!
//! This module provides:
//! - A status table per Terraform file
//! - The legend of action and position symbols
//! - Plan and apply summary lines

use crate::domain::{FileReconcileResult, ReconcileResult, ReconcileSummary, SkipReason};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use crate::update::SetOutcome;
use crate::version::{Action, Position};
use colored::Colorize;
use std::io::Write;

const HEADERS: [&str; 8] = [
    "",
    "target",
    "name",
    "current",
    "latest available",
    "constraint",
    "latest allowed",
    "status",
];

/// How a table row is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowStyle {
    Upgrade,
    Downgrade,
    Unchanged,
    Problem,
    Skipped,
}

struct Row {
    cells: [String; 8],
    style: RowStyle,
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    /// Whether updates were written
    apply: bool,
    color: bool,
}

impl TextFormatter {
    pub fn new(verbosity: Verbosity, apply: bool) -> Self {
        Self {
            verbosity,
            apply,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, apply: bool, color: bool) -> Self {
        Self {
            verbosity,
            apply,
            color,
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint(&self, text: String, style: RowStyle) -> String {
        if !self.color {
            return text;
        }
        match style {
            RowStyle::Upgrade => text.green().to_string(),
            RowStyle::Downgrade => text.yellow().to_string(),
            RowStyle::Unchanged => text,
            RowStyle::Problem => text.red().to_string(),
            RowStyle::Skipped => text.dimmed().to_string(),
        }
    }

    /// Builds the table row for one result, or None when it is hidden
    fn row(&self, result: &ReconcileResult) -> Option<Row> {
        let record = result.record();
        let constraint = record.constraint.clone().unwrap_or_default();

        match result {
            ReconcileResult::Update { evaluation, .. }
            | ReconcileResult::Unchanged { evaluation, .. } => {
                let style = if evaluation.status.is_problem() {
                    RowStyle::Problem
                } else {
                    match result.direction() {
                        Action::Upgrade => RowStyle::Upgrade,
                        Action::Downgrade => RowStyle::Downgrade,
                        Action::NoChange => RowStyle::Unchanged,
                    }
                };
                Some(Row {
                    cells: [
                        evaluation.status.symbol(),
                        record.kind.target().to_string(),
                        record.name.clone(),
                        record.version.clone(),
                        evaluation.latest_available.clone().unwrap_or_default(),
                        constraint,
                        evaluation.latest_allowed.clone().unwrap_or_default(),
                        evaluation.status.label().to_string(),
                    ],
                    style,
                })
            }
            ReconcileResult::Skip { reason, .. } => {
                let style = match reason {
                    SkipReason::NotTargeted if self.verbosity != Verbosity::Verbose => {
                        return None
                    }
                    SkipReason::NotTargeted => RowStyle::Skipped,
                    SkipReason::FetchFailed(_)
                    | SkipReason::InvalidConstraint(_)
                    | SkipReason::RewriteFailed(_) => RowStyle::Problem,
                };
                Some(Row {
                    cells: [
                        String::new(),
                        record.kind.target().to_string(),
                        record.name.clone(),
                        record.version.clone(),
                        String::new(),
                        constraint,
                        String::new(),
                        reason.to_string(),
                    ],
                    style,
                })
            }
        }
    }

    fn write_table(&self, rows: &[Row], writer: &mut dyn Write) -> std::io::Result<()> {
        let mut widths = HEADERS.map(|h| h.len());
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row.cells.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(widths.iter())
                .map(|(cell, width)| format!("{:width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
        writeln!(writer, "  {}", self.bold(&line(&header)))?;
        for row in rows {
            writeln!(writer, "  {}", self.paint(line(&row.cells), row.style))?;
        }
        Ok(())
    }

    fn write_legend(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer, "Actions and version positions are shown as action/position:")?;
        let actions = [Action::Upgrade, Action::Downgrade, Action::NoChange]
            .iter()
            .map(|a| format!("{} {}", a.symbol(), a.description()))
            .collect::<Vec<_>>()
            .join(", ");
        let positions = [
            Position::LatestAvailable,
            Position::LatestAllowed,
            Position::NoSuitableVersion,
            Position::Bug,
        ]
        .iter()
        .map(|p| format!("{} {}", p.symbol(), p.description()))
        .collect::<Vec<_>>()
        .join(", ");
        writeln!(writer, "  actions:   {}", actions)?;
        writeln!(writer, "  positions: {}", positions)?;
        writeln!(writer)
    }

    fn write_errors(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}:", "Errors".red().bold())?;
        } else {
            writeln!(writer, "Errors:")?;
        }
        for error in &result.errors {
            if self.color {
                writeln!(writer, "  {} {}", "✗".red(), error)?;
            } else {
                writeln!(writer, "  - {}", error)?;
            }
        }
        writeln!(writer)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.summary, writer);
        }

        if result.summary.total_dependencies() > 0 {
            self.write_legend(writer)?;
        }

        for file in &result.summary.files {
            self.format_file(file, writer)?;
        }

        if result.has_errors() {
            self.write_errors(result, writer)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &ReconcileSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let line = if self.apply {
            format!(
                "Apply complete! Resources: {} upgraded, {} downgraded",
                summary.upgraded(),
                summary.downgraded()
            )
        } else if summary.has_changes() {
            format!(
                "Plan: {} to upgrade, {} to downgrade",
                summary.upgraded(),
                summary.downgraded()
            )
        } else {
            "No changes. Dependency versions are up-to-date.".to_string()
        };

        if self.color {
            writeln!(writer, "{}", line.green().bold())?;
        } else {
            writeln!(writer, "{}", line)?;
        }

        let failures = summary.fetch_failures();
        if failures > 0 {
            let note = format!(
                "{} {} could not be checked",
                failures,
                if failures == 1 {
                    "dependency"
                } else {
                    "dependencies"
                }
            );
            if self.color {
                writeln!(writer, "{}", note.red())?;
            } else {
                writeln!(writer, "{}", note)?;
            }
        }
        Ok(())
    }

    fn format_file(
        &self,
        file: &FileReconcileResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let rows: Vec<Row> = file.results.iter().filter_map(|r| self.row(r)).collect();
        if rows.is_empty() {
            return Ok(());
        }

        writeln!(writer, "{}", self.bold(&file.path.display().to_string()))?;
        self.write_table(&rows, writer)?;
        writeln!(writer)
    }

    fn format_set(&self, outcome: &SetOutcome, writer: &mut dyn Write) -> std::io::Result<()> {
        let subject = format!("{}.{}", outcome.target, outcome.name);

        if !outcome.is_change() {
            return writeln!(
                writer,
                "No changes. {} {} is already {}",
                subject,
                outcome.attribute,
                display_value(&outcome.new_value)
            );
        }

        let verb = if outcome.written { "Updated" } else { "Would update" };
        let line = format!(
            "{} {} {}: {} -> {} in {}",
            verb,
            subject,
            outcome.attribute,
            display_value(&outcome.old_value),
            display_value(&outcome.new_value),
            outcome.file_path.display()
        );
        if self.color {
            writeln!(writer, "{}", line.green())?;
        } else {
            writeln!(writer, "{}", line)?;
        }

        if self.verbosity == Verbosity::Verbose {
            for (old, new) in outcome.old_code.lines().zip(outcome.new_code.lines()) {
                if old != new {
                    writeln!(writer, "  - {}", old.trim())?;
                    writeln!(writer, "  + {}", new.trim())?;
                }
            }
        }
        Ok(())
    }
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}
