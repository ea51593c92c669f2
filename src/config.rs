//! Configuration file support
//!
//! An optional `.tfsync.toml` in the scanned directory (or the file named by
//! `--config`) overrides the file pattern and the registry endpoints:
//!
//! ```toml
//! [scan]
//! pattern = "*.tf"
//!
//! [registry]
//! registry_url = "https://registry.terraform.io"
//! releases_url = "https://releases.hashicorp.com"
//! github_api_url = "https://api.github.com"
//! timeout_secs = 30
//! max_retries = 3
//! github_token = "ghp_..."
//! ```

use crate::error::ConfigError;
use crate::registry::RetrievalConfig;
use crate::terraform::DEFAULT_PATTERN;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File looked up in the scanned directory when `--config` is not given
pub const CONFIG_FILE_NAME: &str = ".tfsync.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanOptions {
    /// Glob matched against file names in the scanned directory
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryOptions {
    pub registry_url: Option<String>,
    pub releases_url: Option<String>,
    pub github_api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub github_token: Option<String>,
}

/// Contents of a configuration file; every setting is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scan: ScanOptions,
    pub registry: RegistryOptions,
}

impl Config {
    /// Parses configuration text; `path` is only used in error messages
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Loads an explicitly named configuration file, which must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Self::from_toml(&content, path)
    }

    /// Loads `<dir>/.tfsync.toml` if present, otherwise the defaults
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::default_path(dir);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads `explicit` when given, otherwise discovers one in `dir`
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::discover(dir),
        }
    }

    pub fn default_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// File pattern from the config file, or `*.tf`
    pub fn pattern(&self) -> &str {
        self.scan.pattern.as_deref().unwrap_or(DEFAULT_PATTERN)
    }

    /// Builds the retrieval settings
    ///
    /// A token in the file wins over `env_token`.
    pub fn retrieval_config(&self, env_token: Option<String>) -> RetrievalConfig {
        let defaults = RetrievalConfig::default();
        let registry = &self.registry;
        let url = |value: &Option<String>, default: String| {
            value
                .as_deref()
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(default)
        };

        RetrievalConfig {
            registry_url: url(&registry.registry_url, defaults.registry_url),
            releases_url: url(&registry.releases_url, defaults.releases_url),
            github_api_url: url(&registry.github_api_url, defaults.github_api_url),
            timeout: registry
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: registry.max_retries.unwrap_or(defaults.max_retries),
            github_token: registry
                .github_token
                .clone()
                .filter(|t| !t.is_empty())
                .or(env_token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pattern(), "*.tf");

        let retrieval = config.retrieval_config(None);
        assert_eq!(retrieval.registry_url, "https://registry.terraform.io");
        assert_eq!(retrieval.timeout, Duration::from_secs(30));
        assert_eq!(retrieval.max_retries, 3);
        assert!(retrieval.github_token.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[scan]
pattern = "versions*.tf"

[registry]
registry_url = "https://registry.example.com/"
releases_url = "https://releases.example.com"
github_api_url = "https://github.example.com/api/v3"
timeout_secs = 5
max_retries = 1
github_token = "from-file"
"#;
        let config = Config::from_toml(content, Path::new(".tfsync.toml")).unwrap();
        assert_eq!(config.pattern(), "versions*.tf");

        let retrieval = config.retrieval_config(Some("from-env".to_string()));
        assert_eq!(retrieval.registry_url, "https://registry.example.com");
        assert_eq!(retrieval.releases_url, "https://releases.example.com");
        assert_eq!(retrieval.github_api_url, "https://github.example.com/api/v3");
        assert_eq!(retrieval.timeout, Duration::from_secs(5));
        assert_eq!(retrieval.max_retries, 1);
        assert_eq!(retrieval.github_token.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_env_token_fallback() {
        let config = Config::from_toml("[registry]\ntimeout_secs = 10\n", Path::new("x")).unwrap();
        let retrieval = config.retrieval_config(Some("from-env".to_string()));
        assert_eq!(retrieval.github_token.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_parse_error() {
        let result = Config::from_toml("[scan]\npattern = 1\n", Path::new("bad.toml"));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));

        let result = Config::from_toml("[unknown]\nkey = true\n", Path::new("bad.toml"));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_discover_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_discover_reads_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[scan]\npattern = \"main.tf\"\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.pattern(), "main.tf");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let result = Config::resolve(Some(&dir.path().join("nope.toml")), dir.path());
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
