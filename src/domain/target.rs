//! Target kinds for Terraform dependency declarations

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The form of a version-bearing declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// `terraform { required_version = ... }`
    Terraform,
    /// An entry in `required_providers`
    Provider,
    /// A `module` block sourced from a registry
    ModuleRegistry,
    /// A `module` block sourced from Git with a `?ref=`
    ModuleGit,
}

impl TargetKind {
    /// Returns the user-facing target this kind belongs to
    pub fn target(&self) -> Target {
        match self {
            TargetKind::Terraform => Target::Terraform,
            TargetKind::Provider => Target::Provider,
            TargetKind::ModuleRegistry | TargetKind::ModuleGit => Target::Module,
        }
    }

    /// Returns the display name for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetKind::Terraform => "terraform",
            TargetKind::Provider => "provider",
            TargetKind::ModuleRegistry => "module (registry)",
            TargetKind::ModuleGit => "module (git)",
        }
    }

    /// Returns all kinds in extraction order
    pub fn all() -> &'static [TargetKind] {
        &[
            TargetKind::Terraform,
            TargetKind::Provider,
            TargetKind::ModuleRegistry,
            TargetKind::ModuleGit,
        ]
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Target as named on the command line: `terraform`, `provider` or `module`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Terraform,
    Provider,
    Module,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Terraform => "terraform",
            Target::Provider => "provider",
            Target::Module => "module",
        }
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terraform" => Ok(Target::Terraform),
            "provider" | "providers" => Ok(Target::Provider),
            "module" | "modules" => Ok(Target::Module),
            _ => Err(ConfigError::InvalidTarget {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
