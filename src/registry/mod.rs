//! Version retrieval from remote sources
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - HashiCorp releases adapter (Terraform CLI)
//! - Terraform registry adapters (providers and modules)
//! - GitHub tags adapter (Git-sourced modules)
//! - `RegistrySet`, which routes each record to the adapter for its kind

mod client;
mod github;
mod modules;
mod providers;
mod releases;

pub use client::{HttpClient, DEFAULT_TIMEOUT, MAX_RETRIES};
pub use github::{parse_github_repo, GitHubTagsAdapter, DEFAULT_GITHUB_API_URL};
pub use modules::ModuleRegistryAdapter;
pub use providers::{ProviderRegistryAdapter, DEFAULT_REGISTRY_URL};
pub use releases::{ReleasesAdapter, DEFAULT_RELEASES_URL};

use crate::domain::{DependencyRecord, TargetKind};
use crate::error::RegistryError;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Target kind this adapter serves
    fn kind(&self) -> TargetKind;

    /// Human-readable registry name used in errors
    fn registry_name(&self) -> &'static str {
        RegistryError::registry_name(self.kind())
    }

    /// Fetch every published version for a source locator
    async fn fetch_versions(&self, source: &str) -> Result<Vec<String>, RegistryError>;
}

/// Anything that can list the available versions of a dependency
#[async_trait]
pub trait VersionSource: Send + Sync {
    async fn fetch_versions(&self, record: &DependencyRecord) -> Result<Vec<String>, RegistryError>;
}

/// Endpoints and credentials for version retrieval
///
/// Built once at startup and passed to the adapters; nothing below this
/// point reads the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalConfig {
    pub registry_url: String,
    pub releases_url: String,
    pub github_api_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub github_token: Option<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            releases_url: DEFAULT_RELEASES_URL.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: MAX_RETRIES,
            github_token: None,
        }
    }
}

/// Create the adapter for a target kind
pub fn create_adapter(
    kind: TargetKind,
    config: &RetrievalConfig,
    client: HttpClient,
) -> Box<dyn RegistryAdapter> {
    match kind {
        TargetKind::Terraform => Box::new(ReleasesAdapter::with_base_url(
            client,
            &config.releases_url,
        )),
        TargetKind::Provider => Box::new(ProviderRegistryAdapter::with_base_url(
            client,
            &config.registry_url,
        )),
        TargetKind::ModuleRegistry => Box::new(ModuleRegistryAdapter::with_base_url(
            client,
            &config.registry_url,
        )),
        TargetKind::ModuleGit => Box::new(GitHubTagsAdapter::with_base_url(
            client.with_token(config.github_token.clone()),
            &config.github_api_url,
        )),
    }
}

/// One adapter per target kind
pub struct RegistrySet {
    adapters: Vec<Box<dyn RegistryAdapter>>,
}

impl RegistrySet {
    pub fn new(config: &RetrievalConfig) -> Result<Self, RegistryError> {
        let client = HttpClient::with_timeout(config.timeout)?.with_max_retries(config.max_retries);

        let adapters = TargetKind::all()
            .iter()
            .map(|&kind| create_adapter(kind, config, client.clone()))
            .collect();

        Ok(Self { adapters })
    }

    fn adapter(&self, kind: TargetKind) -> Option<&dyn RegistryAdapter> {
        self.adapters
            .iter()
            .find(|adapter| adapter.kind() == kind)
            .map(|adapter| adapter.as_ref())
    }
}

#[async_trait]
impl VersionSource for RegistrySet {
    async fn fetch_versions(&self, record: &DependencyRecord) -> Result<Vec<String>, RegistryError> {
        let adapter = self
            .adapter(record.kind)
            .ok_or_else(|| RegistryError::UnsupportedSource {
                source_locator: record.source.clone(),
                kind: record.kind,
            })?;

        tracing::debug!(
            name = %record.name,
            source = %record.source,
            registry = adapter.registry_name(),
            "Fetching versions"
        );
        let versions = adapter.fetch_versions(&record.source).await?;
        tracing::debug!(name = %record.name, count = versions.len(), "Fetched versions");

        Ok(versions)
    }
}
