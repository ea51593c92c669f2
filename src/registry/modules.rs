//! Terraform module registry adapter
//!
//! API endpoint: {registry_url}/v1/modules/{namespace}/{name}/{provider}

use super::providers::DEFAULT_REGISTRY_URL;
use crate::domain::TargetKind;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter};
use async_trait::async_trait;
use serde::Deserialize;

/// Module registry adapter
pub struct ModuleRegistryAdapter {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ModuleResponse {
    #[serde(default)]
    versions: Vec<String>,
}

impl ModuleRegistryAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, DEFAULT_REGISTRY_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn build_url(&self, source: &str) -> String {
        format!("{}/v1/modules/{}", self.base_url, source.trim_matches('/'))
    }
}

#[async_trait]
impl RegistryAdapter for ModuleRegistryAdapter {
    fn kind(&self) -> TargetKind {
        TargetKind::ModuleRegistry
    }

    async fn fetch_versions(&self, source: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.build_url(source);
        let response: ModuleResponse = self
            .client
            .get_json(&url, source, self.registry_name())
            .await?;

        Ok(response.versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_adapter_kind() {
        let adapter = ModuleRegistryAdapter::new(HttpClient::new().unwrap());
        assert_eq!(adapter.kind(), TargetKind::ModuleRegistry);
    }

    #[test]
    fn test_build_url() {
        let adapter = ModuleRegistryAdapter::with_base_url(
            HttpClient::new().unwrap(),
            "https://registry.example.com/",
        );
        assert_eq!(
            adapter.build_url("terraform-aws-modules/vpc/aws"),
            "https://registry.example.com/v1/modules/terraform-aws-modules/vpc/aws"
        );
    }

    #[test]
    fn test_parse_module_response() {
        let json = r#"{"id": "terraform-aws-modules/vpc/aws/5.1.0", "versions": ["5.0.0", "5.1.0"]}"#;
        let response: ModuleResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.versions.len(), 2);
    }
}
