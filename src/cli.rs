//! CLI argument parsing module for tfsync

use crate::domain::{DependencyKey, Target};
use crate::error::ConfigError;
use crate::output::OutputConfig;
use crate::terraform::Attribute;
use crate::update::{GetAttribute, GetOptions, SetOptions, UpdateFilter};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

fn parse_target(s: &str) -> Result<Target, String> {
    s.parse::<Target>().map_err(|e| e.to_string())
}

fn parse_get_attribute(s: &str) -> Result<GetAttribute, String> {
    s.parse::<GetAttribute>().map_err(|e| e.to_string())
}

fn parse_set_attribute(s: &str) -> Result<Attribute, String> {
    s.parse::<Attribute>().map_err(|e| e.to_string())
}

/// Terraform dependency version reconciler
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tfsync",
    version,
    about = "Keep Terraform, provider and module versions within their declared constraints"
)]
pub struct CliArgs {
    /// Configuration file (default: <PATH>/.tfsync.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the version changes that apply would make
    Plan(RunArgs),

    /// Rewrite declared versions to the latest allowed version
    Apply(RunArgs),

    /// Print one attribute of a declaration
    Get(GetArgs),

    /// Print the names of every declaration of one kind
    List(ListArgs),

    /// Rewrite the version or constraint of one declaration
    Set(SetArgs),
}

/// Options shared by every subcommand that scans a directory
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// File pattern inside the directory (default: *.tf)
    #[arg(long)]
    pub pattern: Option<String>,

    /// Ignore pre-release versions
    #[arg(long)]
    pub exclude_prerelease: bool,

    /// Treat every available version as allowed
    #[arg(long)]
    pub ignore_constraints: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory containing Terraform files
    #[arg(default_value = ".")]
    pub path: PathBuf,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Only reconcile this declaration (can be specified multiple times)
    #[arg(
        long,
        num_args = 2,
        value_names = ["KIND", "NAME"],
        action = ArgAction::Append
    )]
    pub target: Vec<String>,

    /// Show changes in diff format
    #[arg(long)]
    pub diff: bool,

    /// Apply without asking for confirmation
    #[arg(long)]
    pub auto_approve: bool,
}

impl RunArgs {
    /// Parses `--target KIND NAME` pairs
    pub fn targets(&self) -> Result<Vec<DependencyKey>, ConfigError> {
        self.target
            .chunks(2)
            .map(|pair| {
                let target = pair[0].parse::<Target>()?;
                let name = pair.get(1).cloned().unwrap_or_default();
                Ok(DependencyKey::new(target, name))
            })
            .collect()
    }

    /// Builds the update filter from the scan options and targets
    pub fn filter(&self) -> Result<UpdateFilter, ConfigError> {
        Ok(UpdateFilter::new()
            .with_targets(self.targets()?)
            .with_exclude_prerelease(self.scan.exclude_prerelease)
            .with_ignore_constraints(self.scan.ignore_constraints))
    }
}

#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    /// terraform, provider or module
    #[arg(value_parser = parse_target)]
    pub kind: Target,

    /// Declaration name (`terraform` for the Terraform version)
    pub name: String,

    /// Attribute to print
    #[arg(value_parser = parse_get_attribute)]
    pub attribute: GetAttribute,

    /// Directory containing Terraform files
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Only list versions allowed by the declared constraint
    #[arg(long)]
    pub allowed: bool,

    /// List at most N versions, newest first (0 lists all)
    #[arg(long, value_name = "N", default_value_t = 5)]
    pub top: usize,
}

impl GetArgs {
    pub fn options(&self) -> GetOptions {
        GetOptions {
            allowed: self.allowed && !self.scan.ignore_constraints,
            top: (self.top > 0).then_some(self.top),
            exclude_prerelease: self.scan.exclude_prerelease,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// terraform, provider or module
    #[arg(value_parser = parse_target)]
    pub kind: Target,

    /// Directory containing Terraform files
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    #[command(flatten)]
    pub scan: ScanArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    /// terraform, provider or module
    #[arg(value_parser = parse_target)]
    pub kind: Target,

    /// Declaration name (`terraform` for the Terraform version)
    pub name: String,

    /// `version` or `constraint`
    #[arg(value_parser = parse_set_attribute)]
    pub attribute: Attribute,

    /// New value; an empty constraint removes the comment
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Directory containing Terraform files
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Show the change without writing it
    #[arg(long)]
    pub what_if: bool,

    /// Write a version even if it violates the declared constraint
    #[arg(long)]
    pub force: bool,

    /// Show changes in diff format
    #[arg(long)]
    pub diff: bool,
}

impl SetArgs {
    pub fn options(&self) -> SetOptions {
        SetOptions {
            what_if: self.what_if,
            force: self.force,
            ignore_constraints: self.scan.ignore_constraints,
        }
    }
}

impl CliArgs {
    /// Directory scanned by the subcommand
    pub fn path(&self) -> &Path {
        match &self.command {
            Command::Plan(args) | Command::Apply(args) => &args.path,
            Command::Get(args) => &args.path,
            Command::List(args) => &args.path,
            Command::Set(args) => &args.path,
        }
    }

    pub fn scan(&self) -> &ScanArgs {
        match &self.command {
            Command::Plan(args) | Command::Apply(args) => &args.scan,
            Command::Get(args) => &args.scan,
            Command::List(args) => &args.scan,
            Command::Set(args) => &args.scan,
        }
    }

    pub fn is_apply(&self) -> bool {
        matches!(self.command, Command::Apply(_))
    }

    /// Whether apply may write without asking first
    pub fn auto_approve(&self) -> bool {
        match &self.command {
            Command::Apply(args) => args.auto_approve,
            _ => true,
        }
    }

    fn diff(&self) -> bool {
        match &self.command {
            Command::Plan(args) | Command::Apply(args) => args.diff,
            Command::Set(args) => args.diff,
            Command::Get(_) | Command::List(_) => false,
        }
    }

    /// Builds the output configuration for this invocation
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::from_cli(
            self.json,
            self.diff(),
            self.verbose,
            self.quiet,
            self.is_apply(),
        )
        .with_color(!self.no_color)
    }

    /// Progress bars only make sense for interactive text output
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
