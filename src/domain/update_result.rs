//! Reconciliation decision result types

use super::DependencyRecord;
use crate::version::{parse, Action, Status};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason why a dependency was not evaluated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Not named by any `--target`
    NotTargeted,
    /// Failed to retrieve available versions
    FetchFailed(String),
    /// The declared constraint cannot be evaluated
    InvalidConstraint(String),
    /// The planned version could not be written into the file
    RewriteFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotTargeted => write!(f, "not targeted"),
            SkipReason::FetchFailed(msg) => write!(f, "fetch failed: {}", msg),
            SkipReason::InvalidConstraint(msg) => write!(f, "invalid constraint: {}", msg),
            SkipReason::RewriteFailed(msg) => write!(f, "rewrite failed: {}", msg),
        }
    }
}

/// Versions and status computed for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub latest_available: Option<String>,
    pub latest_allowed: Option<String>,
    pub status: Status,
}

impl Evaluation {
    pub fn new(
        latest_available: Option<String>,
        latest_allowed: Option<String>,
        status: Status,
    ) -> Self {
        Self {
            latest_available,
            latest_allowed,
            status,
        }
    }
}

/// Result of reconciling a single dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReconcileResult {
    /// Declared version will be rewritten to `new_version`
    Update {
        record: DependencyRecord,
        new_version: String,
        evaluation: Evaluation,
    },
    /// Declared version stays as is
    Unchanged {
        record: DependencyRecord,
        evaluation: Evaluation,
    },
    /// Dependency was not evaluated
    Skip {
        record: DependencyRecord,
        reason: SkipReason,
    },
}

impl ReconcileResult {
    /// Creates an Update result
    pub fn update(
        record: DependencyRecord,
        new_version: impl Into<String>,
        evaluation: Evaluation,
    ) -> Self {
        ReconcileResult::Update {
            record,
            new_version: new_version.into(),
            evaluation,
        }
    }

    /// Creates an Unchanged result
    pub fn unchanged(record: DependencyRecord, evaluation: Evaluation) -> Self {
        ReconcileResult::Unchanged { record, evaluation }
    }

    /// Creates a Skip result
    pub fn skip(record: DependencyRecord, reason: SkipReason) -> Self {
        ReconcileResult::Skip { record, reason }
    }

    /// Creates a Skip result for a retrieval failure
    pub fn skip_fetch_failed(record: DependencyRecord, message: impl Into<String>) -> Self {
        Self::skip(record, SkipReason::FetchFailed(message.into()))
    }

    pub fn is_update(&self) -> bool {
        matches!(self, ReconcileResult::Update { .. })
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, ReconcileResult::Unchanged { .. })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, ReconcileResult::Skip { .. })
    }

    /// Returns true if version retrieval failed for this dependency
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ReconcileResult::Skip {
                reason: SkipReason::FetchFailed(_),
                ..
            }
        )
    }

    /// Returns the record reference
    pub fn record(&self) -> &DependencyRecord {
        match self {
            ReconcileResult::Update { record, .. } => record,
            ReconcileResult::Unchanged { record, .. } => record,
            ReconcileResult::Skip { record, .. } => record,
        }
    }

    /// Returns the evaluation, if the dependency was evaluated
    pub fn evaluation(&self) -> Option<&Evaluation> {
        match self {
            ReconcileResult::Update { evaluation, .. } => Some(evaluation),
            ReconcileResult::Unchanged { evaluation, .. } => Some(evaluation),
            ReconcileResult::Skip { .. } => None,
        }
    }

    /// Returns the status, if the dependency was evaluated
    pub fn status(&self) -> Option<Status> {
        self.evaluation().map(|e| e.status)
    }

    /// Returns the direction of the rewrite for updates
    ///
    /// Follows the actual versions rather than the status symbol, so a
    /// `pinned out-of-date` status never counts as a change.
    pub fn direction(&self) -> Action {
        match self {
            ReconcileResult::Update {
                record,
                new_version,
                ..
            } => {
                if parse(new_version) > parse(&record.version) {
                    Action::Upgrade
                } else if parse(new_version) < parse(&record.version) {
                    Action::Downgrade
                } else {
                    Action::NoChange
                }
            }
            _ => Action::NoChange,
        }
    }
}

impl fmt::Display for ReconcileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileResult::Update {
                record,
                new_version,
                evaluation,
            } => write!(
                f,
                "{}: {} → {} {}",
                record.name, record.version, new_version, evaluation.status
            ),
            ReconcileResult::Unchanged { record, evaluation } => {
                write!(f, "{}: {} {}", record.name, record.version, evaluation.status)
            }
            ReconcileResult::Skip { record, reason } => {
                write!(f, "{}: skipped ({})", record.name, reason)
            }
        }
    }
}
