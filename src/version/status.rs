//! Status classification
//!
//! Relates the current, latest available and latest allowed versions of a
//! dependency. Each status carries an action symbol (`+`, `-`, `~`) and a
//! position symbol (`*`, `.`, `x`, `!`).

use super::constraint::{evaluate, Operator};
use super::semver::{parse, ParsedVersion};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What reconciliation does to the declared version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Upgrade,
    Downgrade,
    NoChange,
}

impl Action {
    pub fn symbol(&self) -> char {
        match self {
            Action::Upgrade => '+',
            Action::Downgrade => '-',
            Action::NoChange => '~',
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Action::Upgrade => "upgraded",
            Action::Downgrade => "downgraded",
            Action::NoChange => "no change",
        }
    }
}

/// Where the declared version ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    LatestAvailable,
    LatestAllowed,
    NoSuitableVersion,
    Bug,
}

impl Position {
    pub fn symbol(&self) -> char {
        match self {
            Position::LatestAvailable => '*',
            Position::LatestAllowed => '.',
            Position::NoSuitableVersion => 'x',
            Position::Bug => '!',
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Position::LatestAvailable => "latest available",
            Position::LatestAllowed => "latest allowed",
            Position::NoSuitableVersion => "no suitable version",
            Position::Bug => "bug",
        }
    }
}

/// Relationship between current, latest available and latest allowed versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Current is both the latest available and the latest allowed
    UpToDate,
    /// Current is the latest allowed, but a newer version exists
    PinnedOutOfDate,
    UpgradeToAvailable,
    UpgradeToAllowed,
    DowngradeToAvailable,
    DowngradeToAllowed,
    /// Nothing in the available set satisfies the constraint
    NoSuitableVersion,
    /// The inputs fit none of the known relationships
    ClassificationError,
}

impl Status {
    /// Returns every status in display order
    pub fn all() -> &'static [Status] {
        &[
            Status::UpToDate,
            Status::PinnedOutOfDate,
            Status::UpgradeToAvailable,
            Status::UpgradeToAllowed,
            Status::DowngradeToAvailable,
            Status::DowngradeToAllowed,
            Status::NoSuitableVersion,
            Status::ClassificationError,
        ]
    }

    pub fn action(&self) -> Action {
        match self {
            Status::UpgradeToAvailable | Status::UpgradeToAllowed => Action::Upgrade,
            Status::DowngradeToAvailable | Status::DowngradeToAllowed => Action::Downgrade,
            Status::UpToDate
            | Status::PinnedOutOfDate
            | Status::NoSuitableVersion
            | Status::ClassificationError => Action::NoChange,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Status::UpToDate | Status::UpgradeToAvailable | Status::DowngradeToAvailable => {
                Position::LatestAvailable
            }
            Status::PinnedOutOfDate | Status::UpgradeToAllowed | Status::DowngradeToAllowed => {
                Position::LatestAllowed
            }
            Status::NoSuitableVersion => Position::NoSuitableVersion,
            Status::ClassificationError => Position::Bug,
        }
    }

    /// Returns the `action/position` symbol pair, e.g. `+/*`
    pub fn symbol(&self) -> String {
        format!("{}/{}", self.action().symbol(), self.position().symbol())
    }

    /// Returns the short marker shown before the label
    pub fn marker(&self) -> &'static str {
        match self {
            Status::UpToDate => "(*)",
            Status::PinnedOutOfDate => "(.)",
            Status::UpgradeToAvailable => "(->)",
            Status::UpgradeToAllowed => "(>)",
            Status::DowngradeToAvailable => "(<-)",
            Status::DowngradeToAllowed => "(<)",
            Status::NoSuitableVersion => "(x)",
            Status::ClassificationError => "(!)",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::UpToDate => "up-to-date",
            Status::PinnedOutOfDate => "pinned out-of-date",
            Status::UpgradeToAvailable => "upgraded to latest",
            Status::UpgradeToAllowed => "upgraded to allowed",
            Status::DowngradeToAvailable => "downgraded to latest",
            Status::DowngradeToAllowed => "downgraded to allowed",
            Status::NoSuitableVersion => "no suitable version",
            Status::ClassificationError => "you found a bug",
        }
    }

    /// Returns true for statuses that should be surfaced as problems
    pub fn is_problem(&self) -> bool {
        matches!(
            self,
            Status::NoSuitableVersion | Status::ClassificationError
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker(), self.label())
    }
}

fn holds(a: &ParsedVersion, op: Operator, b: &ParsedVersion) -> bool {
    // Only plain comparison operators reach here, which cannot fail.
    evaluate(a, op, b).unwrap_or(false)
}

/// Classifies a dependency from its raw version strings
///
/// Rules are checked in order and the first match wins.
pub fn classify(current: &str, latest_available: Option<&str>, latest_allowed: Option<&str>) -> Status {
    let c = parse(current);
    let a = latest_available.map_or(ParsedVersion::Invalid, parse);
    let l = latest_allowed.map_or(ParsedVersion::Invalid, parse);

    if l.is_invalid() {
        Status::NoSuitableVersion
    } else if holds(&c, Operator::Eq, &a) && holds(&c, Operator::Eq, &l) {
        Status::UpToDate
    } else if holds(&c, Operator::Ne, &a) && holds(&c, Operator::Eq, &l) {
        Status::PinnedOutOfDate
    } else if holds(&c, Operator::Lt, &a) && holds(&a, Operator::Eq, &l) {
        Status::UpgradeToAvailable
    } else if holds(&c, Operator::Lt, &a) && holds(&a, Operator::Gt, &l) {
        Status::UpgradeToAllowed
    } else if holds(&c, Operator::Gt, &a) && holds(&a, Operator::Eq, &l) {
        Status::DowngradeToAvailable
    } else if holds(&c, Operator::Gt, &l) && holds(&a, Operator::Gt, &l) {
        Status::DowngradeToAllowed
    } else {
        Status::ClassificationError
    }
}
