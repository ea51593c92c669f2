//! Version ranking

use super::semver::parse;
use std::cmp::Ordering;

/// Sorts versions newest first
///
/// The sort is stable. Unparseable versions go last, in input order.
pub fn sort_desc(versions: &[String]) -> Vec<String> {
    let mut keyed: Vec<_> = versions.iter().map(|v| (parse(v), v.clone())).collect();

    keyed.sort_by(|(a, _), (b, _)| match (a.as_version(), b.as_version()) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, v)| v).collect()
}

/// Returns the newest parseable version, if any
pub fn latest(versions: &[String]) -> Option<String> {
    sort_desc(versions)
        .into_iter()
        .next()
        .filter(|v| !parse(v).is_invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sort_desc_numeric_order() {
        let input = versions(&["1.0.0", "1.1.1", "1.10.0", "1.9.0", "2.0"]);
        assert_eq!(
            sort_desc(&input),
            versions(&["2.0", "1.10.0", "1.9.0", "1.1.1", "1.0.0"])
        );
    }

    #[test]
    fn test_sort_desc_is_stable_for_ties() {
        let input = versions(&["v1.0.0", "1.0.0", "release-1.0.0"]);
        assert_eq!(sort_desc(&input), input);
    }

    #[test]
    fn test_sort_desc_invalid_last() {
        let input = versions(&["main", "1.0.0", "dev", "2.0.0"]);
        assert_eq!(
            sort_desc(&input),
            versions(&["2.0.0", "1.0.0", "main", "dev"])
        );
    }

    #[test]
    fn test_latest() {
        let input = versions(&["1.0.0", "1.10.0", "1.9.0", "2.0"]);
        assert_eq!(latest(&input), Some("2.0".to_string()));
    }

    #[test]
    fn test_latest_empty() {
        assert_eq!(latest(&[]), None);
    }

    #[test]
    fn test_latest_all_invalid() {
        assert_eq!(latest(&versions(&["main", "dev"])), None);
    }
}
