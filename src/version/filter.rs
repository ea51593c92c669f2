//! Version set filtering against declared constraint bounds

use super::constraint::ConstraintBound;
use super::semver::parse;
use crate::error::ConstraintError;

/// Returns the versions from `available` that satisfy every bound present
///
/// With no bounds, every parseable version is returned. Input order is kept
/// and unparseable entries are dropped silently.
pub fn allowed_versions(
    available: &[String],
    lower: Option<&ConstraintBound>,
    upper: Option<&ConstraintBound>,
) -> Result<Vec<String>, ConstraintError> {
    let mut allowed = Vec::new();

    for raw in available {
        let parsed = parse(raw);
        if parsed.is_invalid() {
            continue;
        }

        let mut keep = true;
        for bound in [lower, upper].into_iter().flatten() {
            if !bound.satisfied_by(&parsed)? {
                keep = false;
                break;
            }
        }

        if keep {
            allowed.push(raw.clone());
        }
    }

    Ok(allowed)
}

/// Drops versions that carry a pre-release ordinal
pub fn exclude_prereleases(versions: &[String]) -> Vec<String> {
    versions
        .iter()
        .filter(|v| parse(v).len() < 4)
        .cloned()
        .collect()
}
