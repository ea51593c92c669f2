//! Terraform provider registry adapter
//!
//! Fetches provider versions from the public registry.
//! API endpoint: {registry_url}/v1/providers/{namespace}/{type}

use crate::domain::TargetKind;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter};
use async_trait::async_trait;
use serde::Deserialize;

/// Terraform registry base URL
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.terraform.io";

/// Provider registry adapter
pub struct ProviderRegistryAdapter {
    client: HttpClient,
    base_url: String,
}

/// Provider metadata response
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    versions: Vec<String>,
}

impl ProviderRegistryAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, DEFAULT_REGISTRY_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a provider source such as `hashicorp/aws`
    fn build_url(&self, source: &str) -> String {
        format!("{}/v1/providers/{}", self.base_url, source.trim_matches('/'))
    }
}

#[async_trait]
impl RegistryAdapter for ProviderRegistryAdapter {
    fn kind(&self) -> TargetKind {
        TargetKind::Provider
    }

    async fn fetch_versions(&self, source: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.build_url(source);
        let response: ProviderResponse = self
            .client
            .get_json(&url, source, self.registry_name())
            .await?;

        Ok(response.versions)
    }
}
