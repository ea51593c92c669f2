//! Dependency record structures

use super::{Target, TargetKind};
use crate::version::ConstraintBound;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Index key for a dependency: its target and name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyKey {
    pub target: Target,
    pub name: String,
}

impl DependencyKey {
    pub fn new(target: Target, name: impl Into<String>) -> Self {
        Self {
            target,
            name: name.into(),
        }
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target, self.name)
    }
}

/// A version-bearing declaration extracted from a Terraform file
///
/// Records are produced fresh by every scan and never mutated. Updating a
/// dependency rewrites its file and a later scan yields a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Declaration form
    pub kind: TargetKind,
    /// Provider local name, module label, or `terraform`
    pub name: String,
    /// Source locator (registry address or Git URL)
    pub source: String,
    /// Declared version as written
    pub version: String,
    /// Raw constraint comment, e.g. `>= 1.0, < 2.0`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<ConstraintBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<ConstraintBound>,
    /// Exact declaration span as it appears in the file
    pub code: String,
    /// File the declaration was read from
    pub file_path: PathBuf,
}

impl DependencyRecord {
    /// Creates a record without a constraint
    pub fn new(
        kind: TargetKind,
        name: impl Into<String>,
        source: impl Into<String>,
        version: impl Into<String>,
        code: impl Into<String>,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            source: source.into(),
            version: version.into(),
            constraint: None,
            lower: None,
            upper: None,
            code: code.into(),
            file_path: file_path.into(),
        }
    }

    /// Sets the constraint and its parsed bounds (builder pattern)
    pub fn with_constraint(
        mut self,
        raw: impl Into<String>,
        lower: Option<ConstraintBound>,
        upper: Option<ConstraintBound>,
    ) -> Self {
        self.constraint = Some(raw.into());
        self.lower = lower;
        self.upper = upper;
        self
    }

    /// Returns the index key for this record
    pub fn key(&self) -> DependencyKey {
        DependencyKey::new(self.kind.target(), &self.name)
    }

    /// Returns true if any constraint bound is declared
    pub fn has_constraint(&self) -> bool {
        self.lower.is_some() || self.upper.is_some()
    }

    /// Returns the file name without its directory
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Returns the file path
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}@{}", self.kind, self.name, self.version)?;
        if let Some(constraint) = &self.constraint {
            write!(f, " ({})", constraint)?;
        }
        Ok(())
    }
}
