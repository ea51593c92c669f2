//! Update filter configuration
//!
//! Encapsulates the options that decide which declarations are reconciled
//! and how their candidate versions are narrowed.

use crate::domain::{DependencyKey, DependencyRecord};

/// Filter configuration for update judgment
#[derive(Debug, Clone, Default)]
pub struct UpdateFilter {
    /// Declarations to process (empty means all)
    pub targets: Vec<DependencyKey>,
    /// Drop versions with a pre-release ordinal before ranking
    pub exclude_prerelease: bool,
    /// Treat every available version as allowed
    pub ignore_constraints: bool,
}

impl UpdateFilter {
    /// Create a new UpdateFilter with default settings (process all)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_targets(mut self, targets: Vec<DependencyKey>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_exclude_prerelease(mut self, exclude: bool) -> Self {
        self.exclude_prerelease = exclude;
        self
    }

    pub fn with_ignore_constraints(mut self, ignore: bool) -> Self {
        self.ignore_constraints = ignore;
        self
    }

    /// Check if a declaration should be processed
    pub fn should_process(&self, record: &DependencyRecord) -> bool {
        if self.targets.is_empty() {
            return true;
        }
        let key = record.key();
        self.targets.iter().any(|target| *target == key)
    }
}
