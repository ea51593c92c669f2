//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ScanError: Issues with discovering and reading Terraform files
//! - RegistryError: Issues with version retrieval
//! - ConstraintError: Unusable constraint expressions
//! - RewriteError: Failures while substituting a token in source text
//! - LookupError: Missing entries in the dependency index
//! - ConfigError: Issues with CLI options or the configuration file
//! - ReconcileError: Failures of a single get/set operation

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{Target, TargetKind};

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// File discovery and IO errors
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Version retrieval errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Single-operation reconciliation errors
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Errors related to Terraform file discovery and IO
#[derive(Error, Debug)]
pub enum ScanError {
    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Invalid glob pattern
    #[error("invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Failed to read a Terraform file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a Terraform file
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to version retrieval
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry}")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry}")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// Source locator that no adapter can serve
    #[error("unsupported source '{source_locator}' for {kind}")]
    UnsupportedSource {
        source_locator: String,
        kind: TargetKind,
    },
}

/// Errors raised while evaluating constraints
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// `~>` needs a bound with exactly two or three components
    #[error(
        "pessimistic constraint '~> {version}' must have two or three parts (e.g. 1.0, 1.1.0), found {components}"
    )]
    InvalidConstraintShape { version: String, components: usize },

    /// The `~>` upper end does not fit in a version component
    #[error("pessimistic constraint '~> {version}' has no representable upper bound")]
    ComponentOverflow { version: String },

    /// Operator string is not one of `=`, `!=`, `<`, `<=`, `>`, `>=`, `~>`
    #[error("unknown constraint operator '{operator}'")]
    UnknownOperator { operator: String },
}

/// Errors raised by the text mutator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// The declaration span does not occur verbatim in the file text
    #[error("declaration not found in file text: {span}")]
    SpanMismatch { span: String },

    /// The declaration span has no version token to replace
    #[error("no version token found in declaration: {span}")]
    TokenNotFound { span: String },
}

/// Errors raised when looking up a dependency
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No record for the given target kind and name
    #[error("no {target} named '{name}' was found")]
    NotFound { target: Target, name: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Invalid target kind given on the command line
    #[error("invalid target '{value}': expected 'terraform', 'provider' or 'module'")]
    InvalidTarget { value: String },

    /// Invalid attribute given on the command line
    #[error("invalid attribute '{value}' for {command}")]
    InvalidAttribute { value: String, command: String },
}

/// Errors from a single get/set reconciliation operation
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Requested version falls outside the declared constraint
    #[error("version {version} for {name} does not satisfy constraint '{constraint}' (use --force or --ignore-constraints)")]
    ConstraintViolation {
        name: String,
        version: String,
        constraint: String,
    },

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ScanError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        ScanError::DirectoryNotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::WriteError {
            path: path.into(),
            source,
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Returns the registry name that serves a target kind
    pub fn registry_name(kind: TargetKind) -> &'static str {
        match kind {
            TargetKind::Terraform => "HashiCorp releases",
            TargetKind::Provider => "Terraform provider registry",
            TargetKind::ModuleRegistry => "Terraform module registry",
            TargetKind::ModuleGit => "GitHub",
        }
    }
}

impl RewriteError {
    /// Creates a new SpanMismatch error
    pub fn span_mismatch(span: impl Into<String>) -> Self {
        RewriteError::SpanMismatch { span: span.into() }
    }

    /// Creates a new TokenNotFound error
    pub fn token_not_found(span: impl Into<String>) -> Self {
        RewriteError::TokenNotFound { span: span.into() }
    }
}
