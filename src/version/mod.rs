//! Version reconciliation core
//!
//! This module provides:
//! - Semantic version parsing into comparable tuples
//! - Constraint evaluation, including the pessimistic `~>` operator
//! - Filtering of available versions against constraint bounds
//! - Ranking of version lists
//! - Status classification of current vs. available vs. allowed

mod constraint;
mod filter;
mod ranker;
mod semver;
mod status;

pub use constraint::{evaluate, pessimistic_range, ConstraintBound, Operator};
pub use filter::{allowed_versions, exclude_prereleases};
pub use ranker::{latest, sort_desc};
pub use semver::{parse, ParsedVersion, SemanticVersion};
pub use status::{classify, Action, Position, Status};
