//! Semantic version parsing
//!
//! Versions are read as an ordered tuple of up to four integers
//! (major, minor, patch, pre-release ordinal). Anything that cannot be read
//! becomes [`ParsedVersion::Invalid`], which never compares equal or ordered
//! to anything.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// First `<int>[.<int>[.<int>]][-<letters><int>]` run in the input
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-*[A-Za-z]*(\d+))?").unwrap()
});

/// A successfully parsed version tuple
///
/// Ordering is lexicographic over the components, so `(2, 0) < (2, 0, 0)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SemanticVersion {
    components: Vec<u64>,
}

impl SemanticVersion {
    /// Creates a version from its components
    pub fn new(components: Vec<u64>) -> Self {
        Self { components }
    }

    /// Returns the components in order
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Returns the number of components (1 to 4)
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if there are no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns true if a pre-release ordinal was parsed
    pub fn is_prerelease(&self) -> bool {
        self.components.len() >= 4
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Result of parsing a raw version string
#[derive(Debug, Clone)]
pub enum ParsedVersion {
    Valid(SemanticVersion),
    Invalid,
}

impl ParsedVersion {
    /// Returns true if parsing failed
    pub fn is_invalid(&self) -> bool {
        matches!(self, ParsedVersion::Invalid)
    }

    /// Returns the parsed version, if any
    pub fn as_version(&self) -> Option<&SemanticVersion> {
        match self {
            ParsedVersion::Valid(v) => Some(v),
            ParsedVersion::Invalid => None,
        }
    }

    /// Returns the number of parsed components (0 when invalid)
    pub fn len(&self) -> usize {
        self.as_version().map_or(0, SemanticVersion::len)
    }

    /// Returns true when no components were parsed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for ParsedVersion {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParsedVersion::Valid(a), ParsedVersion::Valid(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (ParsedVersion::Valid(a), ParsedVersion::Valid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<SemanticVersion> for ParsedVersion {
    fn from(version: SemanticVersion) -> Self {
        ParsedVersion::Valid(version)
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedVersion::Valid(v) => write!(f, "{}", v),
            ParsedVersion::Invalid => write!(f, "<invalid>"),
        }
    }
}

/// Parses a raw version string such as `v1.2.3`, `2.0` or `0.12.0-alpha3`
///
/// Leading non-numeric text is skipped. A pre-release suffix contributes its
/// trailing digits as a fourth component.
pub fn parse(raw: &str) -> ParsedVersion {
    let Some(caps) = VERSION_RE.captures(raw) else {
        return ParsedVersion::Invalid;
    };

    let mut components = Vec::with_capacity(4);
    for group in caps.iter().skip(1).flatten() {
        match group.as_str().parse::<u64>() {
            Ok(n) => components.push(n),
            Err(_) => return ParsedVersion::Invalid,
        }
    }

    ParsedVersion::Valid(SemanticVersion::new(components))
}
