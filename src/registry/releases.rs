//! HashiCorp releases adapter
//!
//! Fetches Terraform CLI versions from the releases index.
//! API endpoint: {releases_url}/terraform/index.json
//!
//! The index maps every published version to its build metadata; only the
//! keys are used.

use crate::domain::TargetKind;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter};
use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::BTreeMap;

/// HashiCorp releases base URL
pub const DEFAULT_RELEASES_URL: &str = "https://releases.hashicorp.com";

/// Terraform CLI releases adapter
pub struct ReleasesAdapter {
    client: HttpClient,
    base_url: String,
}

/// Release index response
#[derive(Debug, Deserialize)]
struct ReleaseIndex {
    versions: BTreeMap<String, IgnoredAny>,
}

impl ReleasesAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, DEFAULT_RELEASES_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the index URL for a product (always `terraform` in practice)
    fn build_url(&self, product: &str) -> String {
        format!("{}/{}/index.json", self.base_url, product)
    }
}

#[async_trait]
impl RegistryAdapter for ReleasesAdapter {
    fn kind(&self) -> TargetKind {
        TargetKind::Terraform
    }

    async fn fetch_versions(&self, _source: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.build_url("terraform");
        let index: ReleaseIndex = self
            .client
            .get_json(&url, "terraform", self.registry_name())
            .await?;

        Ok(index.versions.into_keys().collect())
    }
}
