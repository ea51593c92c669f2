//! Update judgment logic for dependencies
//!
//! This module provides:
//! - Update filter configuration from CLI args
//! - Update judgment engine that classifies a record and picks its target version
//! - Single-record `get` and `set` operations

mod attribute;
mod filter;

pub use attribute::{
    get_attribute, set_attribute, AttributeValue, GetAttribute, GetOptions, SetOptions, SetOutcome,
};
pub use filter::UpdateFilter;

use crate::domain::{DependencyRecord, Evaluation, ReconcileResult, SkipReason};
use crate::error::ConstraintError;
use crate::version::{
    allowed_versions, classify, evaluate, exclude_prereleases, latest, parse, Operator,
};

/// Available and allowed version sets for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    pub available: Vec<String>,
    pub allowed: Vec<String>,
}

/// Narrow `available` by the filter and the record's constraint bounds
pub fn candidates(
    record: &DependencyRecord,
    available: &[String],
    filter: &UpdateFilter,
) -> Result<Candidates, ConstraintError> {
    let available = if filter.exclude_prerelease {
        exclude_prereleases(available)
    } else {
        available.to_vec()
    };

    let allowed = if filter.ignore_constraints {
        available.clone()
    } else {
        allowed_versions(&available, record.lower.as_ref(), record.upper.as_ref())?
    };

    Ok(Candidates { available, allowed })
}

/// Update judgment engine that decides whether to rewrite a dependency
pub struct UpdateJudge {
    filter: UpdateFilter,
}

impl UpdateJudge {
    pub fn new(filter: UpdateFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &UpdateFilter {
        &self.filter
    }

    /// Check if a dependency should be processed at all
    pub fn should_skip(&self, record: &DependencyRecord) -> Option<SkipReason> {
        if self.filter.should_process(record) {
            None
        } else {
            Some(SkipReason::NotTargeted)
        }
    }

    /// Judge a dependency against its available versions
    ///
    /// The target is always the latest allowed version, which may be lower
    /// than the declared one when the declaration violates its constraint.
    pub fn judge(&self, record: &DependencyRecord, available: &[String]) -> ReconcileResult {
        if let Some(reason) = self.should_skip(record) {
            return ReconcileResult::skip(record.clone(), reason);
        }

        let candidates = match candidates(record, available, &self.filter) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(name = %record.name, error = %e, "Cannot evaluate constraint");
                return ReconcileResult::skip(
                    record.clone(),
                    SkipReason::InvalidConstraint(e.to_string()),
                );
            }
        };

        let latest_available = latest(&candidates.available);
        let latest_allowed = latest(&candidates.allowed);
        let status = classify(
            &record.version,
            latest_available.as_deref(),
            latest_allowed.as_deref(),
        );
        tracing::debug!(
            name = %record.name,
            current = %record.version,
            latest_available = latest_available.as_deref().unwrap_or("-"),
            latest_allowed = latest_allowed.as_deref().unwrap_or("-"),
            status = %status,
            "Classified dependency"
        );

        let evaluation = Evaluation::new(latest_available, latest_allowed.clone(), status);

        match latest_allowed {
            Some(target) if needs_rewrite(&record.version, &target) => {
                ReconcileResult::update(record.clone(), target, evaluation)
            }
            _ => ReconcileResult::unchanged(record.clone(), evaluation),
        }
    }
}

fn needs_rewrite(current: &str, target: &str) -> bool {
    evaluate(&parse(current), Operator::Ne, &parse(target)).unwrap_or(false)
}
