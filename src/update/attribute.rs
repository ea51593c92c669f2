//! Single-record `get` and `set` operations

use super::{candidates, UpdateFilter};
use crate::domain::{DependencyRecord, Target};
use crate::error::{ConfigError, ReconcileError};
use crate::registry::VersionSource;
use crate::terraform::{
    read_terraform_file, rewrite, rewrite_span, write_terraform_file, Attribute, DependencyIndex,
};
use crate::version::{allowed_versions, sort_desc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Attribute readable with `get`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GetAttribute {
    Target,
    FilePath,
    FileName,
    Code,
    Name,
    Source,
    Version,
    Versions,
    Constraint,
    LowerConstraintOperator,
    LowerConstraint,
    UpperConstraintOperator,
    UpperConstraint,
}

impl GetAttribute {
    pub fn all() -> &'static [GetAttribute] {
        &[
            GetAttribute::Target,
            GetAttribute::FilePath,
            GetAttribute::FileName,
            GetAttribute::Code,
            GetAttribute::Name,
            GetAttribute::Source,
            GetAttribute::Version,
            GetAttribute::Versions,
            GetAttribute::Constraint,
            GetAttribute::LowerConstraintOperator,
            GetAttribute::LowerConstraint,
            GetAttribute::UpperConstraintOperator,
            GetAttribute::UpperConstraint,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GetAttribute::Target => "target",
            GetAttribute::FilePath => "filepath",
            GetAttribute::FileName => "filename",
            GetAttribute::Code => "code",
            GetAttribute::Name => "name",
            GetAttribute::Source => "source",
            GetAttribute::Version => "version",
            GetAttribute::Versions => "versions",
            GetAttribute::Constraint => "constraint",
            GetAttribute::LowerConstraintOperator => "lower_constraint_operator",
            GetAttribute::LowerConstraint => "lower_constraint",
            GetAttribute::UpperConstraintOperator => "upper_constraint_operator",
            GetAttribute::UpperConstraint => "upper_constraint",
        }
    }
}

impl FromStr for GetAttribute {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('-', "_");
        let normalized = match normalized.as_str() {
            "file_path" => "filepath",
            "file_name" => "filename",
            other => other,
        };
        GetAttribute::all()
            .iter()
            .copied()
            .find(|attribute| attribute.as_str() == normalized)
            .ok_or_else(|| ConfigError::InvalidAttribute {
                value: s.to_string(),
                command: "get".to_string(),
            })
    }
}

impl fmt::Display for GetAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value returned by `get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(text) => f.write_str(text),
            AttributeValue::List(items) => f.write_str(&items.join("\n")),
        }
    }
}

/// Options for `get ... versions`
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Only list versions allowed by the declared constraint
    pub allowed: bool,
    /// Keep at most this many versions, newest first
    pub top: Option<usize>,
    pub exclude_prerelease: bool,
}

/// Options for `set`
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// Report the change without writing it
    pub what_if: bool,
    /// Write a version even if it violates the declared constraint
    pub force: bool,
    pub ignore_constraints: bool,
}

/// What `set` changed, or would change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetOutcome {
    pub name: String,
    pub target: Target,
    pub attribute: Attribute,
    pub file_path: PathBuf,
    pub old_value: String,
    pub new_value: String,
    pub old_code: String,
    pub new_code: String,
    /// Whether the file on disk was rewritten
    pub written: bool,
}

impl SetOutcome {
    pub fn is_change(&self) -> bool {
        self.old_code != self.new_code
    }
}

/// Reads one attribute of the record `target.name`
///
/// `source` is only consulted for `versions`.
pub async fn get_attribute(
    index: &DependencyIndex,
    source: &dyn VersionSource,
    target: Target,
    name: &str,
    attribute: GetAttribute,
    opts: &GetOptions,
) -> Result<AttributeValue, ReconcileError> {
    let record = index.get(target, name)?;

    if attribute == GetAttribute::Versions {
        let fetched = source.fetch_versions(record).await?;
        let filter = UpdateFilter::new().with_exclude_prerelease(opts.exclude_prerelease);
        let candidates = candidates(record, &fetched, &filter)?;
        let set = if opts.allowed {
            candidates.allowed
        } else {
            candidates.available
        };

        let mut versions = sort_desc(&set);
        if let Some(top) = opts.top {
            versions.truncate(top);
        }
        return Ok(AttributeValue::List(versions));
    }

    Ok(AttributeValue::Text(record_attribute(record, attribute)))
}

fn record_attribute(record: &DependencyRecord, attribute: GetAttribute) -> String {
    let lower = record.lower.as_ref();
    let upper = record.upper.as_ref();
    match attribute {
        GetAttribute::Target => record.kind.target().to_string(),
        GetAttribute::FilePath => record.file_path.display().to_string(),
        GetAttribute::FileName => record.file_name(),
        GetAttribute::Code => record.code.clone(),
        GetAttribute::Name => record.name.clone(),
        GetAttribute::Source => record.source.clone(),
        GetAttribute::Version => record.version.clone(),
        GetAttribute::Constraint => record.constraint.clone().unwrap_or_default(),
        GetAttribute::LowerConstraintOperator => {
            lower.map(|b| b.operator.to_string()).unwrap_or_default()
        }
        GetAttribute::LowerConstraint => lower.map(|b| b.version.clone()).unwrap_or_default(),
        GetAttribute::UpperConstraintOperator => {
            upper.map(|b| b.operator.to_string()).unwrap_or_default()
        }
        GetAttribute::UpperConstraint => upper.map(|b| b.version.clone()).unwrap_or_default(),
        GetAttribute::Versions => String::new(),
    }
}

/// Rewrites the version or constraint of `target.name`
///
/// A version outside the declared constraint is refused unless `force` or
/// `ignore_constraints` is set. With `what_if`, nothing is written.
pub fn set_attribute(
    index: &DependencyIndex,
    target: Target,
    name: &str,
    attribute: Attribute,
    value: &str,
    opts: &SetOptions,
) -> Result<SetOutcome, ReconcileError> {
    let record = index.get(target, name)?;

    if attribute == Attribute::Version && !opts.force && !opts.ignore_constraints {
        check_constraint(record, value)?;
    }

    let content = read_terraform_file(record.path())?;
    let updated = rewrite(&content, &record.code, attribute, value)?;
    let new_code = rewrite_span(&record.code, attribute, value)?;

    let written = !opts.what_if && updated != content;
    if written {
        write_terraform_file(record.path(), &updated)?;
        tracing::info!(
            name = %record.name,
            attribute = %attribute,
            value,
            path = %record.file_path.display(),
            "Updated declaration"
        );
    }

    let old_value = match attribute {
        Attribute::Version => record.version.clone(),
        Attribute::Constraint => record.constraint.clone().unwrap_or_default(),
    };

    Ok(SetOutcome {
        name: record.name.clone(),
        target,
        attribute,
        file_path: record.file_path.clone(),
        old_value,
        new_value: value.trim().to_string(),
        old_code: record.code.clone(),
        new_code,
        written,
    })
}

fn check_constraint(record: &DependencyRecord, version: &str) -> Result<(), ReconcileError> {
    if !record.has_constraint() {
        return Ok(());
    }

    let allowed = allowed_versions(
        &[version.to_string()],
        record.lower.as_ref(),
        record.upper.as_ref(),
    )?;
    if allowed.is_empty() {
        return Err(ReconcileError::ConstraintViolation {
            name: record.name.clone(),
            version: version.to_string(),
            constraint: record.constraint.clone().unwrap_or_default(),
        });
    }
    Ok(())
}
