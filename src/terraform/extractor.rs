//! Dependency extraction from Terraform source text
//!
//! Four declaration forms are recognized:
//! - `terraform { required_version = "X" }`
//! - `name = { source = "S", version = "X" }` entries in `required_providers`
//! - `module "N" { source = "S", version = "X" }` for registry modules
//! - `module "N" { source = "S?ref=X" }` for Git modules
//!
//! Any of them may carry a constraint comment right after the version
//! literal, e.g. `version = "4.67.0" # >= 4.0, < 5.0`.

use crate::domain::{DependencyRecord, TargetKind};
use crate::version::ConstraintBound;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

/// Optional constraint comment following a version literal
const CONSTRAINT: &str = r#"(?:[ \t]*#[ \t]*(?P<constraint>(?P<lop>[=!<>~]*)[ \t]*(?P<lver>\d[\w.\-]*)(?:[ \t]*,[ \t]*(?P<uop>[=!<>~]*)[ \t]*(?P<uver>\d[\w.\-]*))?))?"#;

/// Block body that may contain maps nested up to two levels deep
const NESTED_BODY: &str = r"(?:[^{}]|\{(?:[^{}]|\{[^{}]*\})*\})*?";

/// Block body that may contain single-level nested maps
const SHALLOW_BODY: &str = r"(?:[^{}]|\{[^{}]*\})*?";

static TERRAFORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"\bterraform\s*\{{{NESTED_BODY}required_version\s*=\s*"(?P<version>[^"\n]*)"{CONSTRAINT}"#
    ))
    .unwrap()
});

static PROVIDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?P<name>[A-Za-z0-9_\-]+)\s*=\s*\{{[^{{}}]*?source\s*=\s*"(?P<source>[^"\n]*)"[^{{}}]*?\bversion\s*=\s*"(?P<version>[^"\n]*)"{CONSTRAINT}"#
    ))
    .unwrap()
});

static PROVIDER_VERSION_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?P<name>[A-Za-z0-9_\-]+)\s*=\s*\{{[^{{}}]*?\bversion\s*=\s*"(?P<version>[^"\n]*)"{CONSTRAINT}[^{{}}]*?source\s*=\s*"(?P<source>[^"\n]*)""#
    ))
    .unwrap()
});

static MODULE_REGISTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"\bmodule\s+"(?P<name>[^"\n]+)"\s*\{{{SHALLOW_BODY}\bsource\s*=\s*"(?P<source>[^"?\n]*)"{SHALLOW_BODY}\bversion\s*=\s*"(?P<version>[^"\n]*)"{CONSTRAINT}"#
    ))
    .unwrap()
});

static MODULE_REGISTRY_VERSION_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"\bmodule\s+"(?P<name>[^"\n]+)"\s*\{{{SHALLOW_BODY}\bversion\s*=\s*"(?P<version>[^"\n]*)"{CONSTRAINT}{SHALLOW_BODY}\bsource\s*=\s*"(?P<source>[^"?\n]*)""#
    ))
    .unwrap()
});

static MODULE_GIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"\bmodule\s+"(?P<name>[^"\n]+)"\s*\{{{SHALLOW_BODY}\bsource\s*=\s*"(?P<source>[^"\n]*\?(?:[^"\n]*&)?ref=(?P<version>[^"&\n]*)[^"\n]*)"{CONSTRAINT}"#
    ))
    .unwrap()
});

/// Patterns in extraction order, with the kind each one yields
fn patterns() -> [(TargetKind, &'static Regex); 6] {
    [
        (TargetKind::Terraform, &TERRAFORM_RE),
        (TargetKind::Provider, &PROVIDER_RE),
        (TargetKind::Provider, &PROVIDER_VERSION_FIRST_RE),
        (TargetKind::ModuleRegistry, &MODULE_REGISTRY_RE),
        (TargetKind::ModuleRegistry, &MODULE_REGISTRY_VERSION_FIRST_RE),
        (TargetKind::ModuleGit, &MODULE_GIT_RE),
    ]
}

/// Extract every dependency declared in `content`
///
/// Records are returned in the order they appear in the file.
pub fn extract_dependencies(path: &Path, content: &str) -> Vec<DependencyRecord> {
    let mut found: Vec<(usize, DependencyRecord)> = Vec::new();

    for (kind, pattern) in patterns() {
        for caps in pattern.captures_iter(content) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            match build_record(kind, &caps, path) {
                Some(record) => found.push((whole.start(), record)),
                None => {
                    tracing::warn!(
                        path = %path.display(),
                        code = whole.as_str(),
                        "Skipping declaration with unusable constraint"
                    );
                }
            }
        }
    }

    found.sort_by_key(|(start, _)| *start);
    tracing::debug!(path = %path.display(), count = found.len(), "Extracted dependencies");

    found.into_iter().map(|(_, record)| record).collect()
}

fn build_record(kind: TargetKind, caps: &Captures<'_>, path: &Path) -> Option<DependencyRecord> {
    let text = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();

    let (name, source) = match kind {
        TargetKind::Terraform => ("terraform", "hashicorp/terraform"),
        _ => (text("name"), text("source")),
    };

    let record = DependencyRecord::new(
        kind,
        name,
        source,
        text("version"),
        caps.get(0)?.as_str(),
        path,
    );

    let Some(constraint) = caps.name("constraint") else {
        return Some(record);
    };

    let lower = ConstraintBound::parse(text("lop"), text("lver")).ok()?;
    let upper = match (text("uop"), text("uver")) {
        (op, ver) if !op.is_empty() && !ver.is_empty() => Some(ConstraintBound::parse(op, ver).ok()?),
        _ => None,
    };

    Some(record.with_constraint(constraint.as_str().trim(), Some(lower), upper))
}
