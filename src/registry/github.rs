//! GitHub tags adapter for Git-sourced modules
//!
//! Resolves `owner/repo` from the module source and lists the repository tags.
//! API endpoint: {github_api_url}/repos/{owner}/{repo}/tags
//!
//! Unauthenticated requests are limited to 60 per hour; configure a token
//! to lift the limit.

use crate::domain::TargetKind;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// GitHub REST API base URL
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Tags per page (GitHub maximum)
const PER_PAGE: u32 = 100;

static GITHUB_REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com[/:](?P<owner>[^/\s]+)/(?P<repo>[^/\s?]+?)(?:\.git)?(?:/|\?|$)")
        .unwrap()
});

/// GitHub tags adapter
pub struct GitHubTagsAdapter {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Extract `(owner, repo)` from a Git module source
pub fn parse_github_repo(source: &str) -> Option<(String, String)> {
    let caps = GITHUB_REPO_RE.captures(source)?;
    Some((caps["owner"].to_string(), caps["repo"].to_string()))
}

impl GitHubTagsAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, DEFAULT_GITHUB_API_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn build_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/tags?per_page={}",
            self.base_url, owner, repo, PER_PAGE
        )
    }
}

#[async_trait]
impl RegistryAdapter for GitHubTagsAdapter {
    fn kind(&self) -> TargetKind {
        TargetKind::ModuleGit
    }

    async fn fetch_versions(&self, source: &str) -> Result<Vec<String>, RegistryError> {
        let (owner, repo) =
            parse_github_repo(source).ok_or_else(|| RegistryError::UnsupportedSource {
                source_locator: source.to_string(),
                kind: self.kind(),
            })?;

        let url = self.build_url(&owner, &repo);
        let package = format!("{}/{}", owner, repo);
        let tags: Vec<Tag> = self
            .client
            .get_json(&url, &package, self.registry_name())
            .await?;

        Ok(tags.into_iter().map(|tag| tag.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_repo_https() {
        assert_eq!(
            parse_github_repo("git::https://github.com/acme/terraform-network.git?ref=v1.2.0"),
            Some(("acme".to_string(), "terraform-network".to_string()))
        );
    }

    #[test]
    fn test_parse_github_repo_ssh() {
        assert_eq!(
            parse_github_repo("git@github.com:acme/network.git?ref=1.0.0"),
            Some(("acme".to_string(), "network".to_string()))
        );
    }

    #[test]
    fn test_parse_github_repo_without_suffix() {
        assert_eq!(
            parse_github_repo("github.com/acme/network?ref=v1"),
            Some(("acme".to_string(), "network".to_string()))
        );
    }

    #[test]
    fn test_parse_github_repo_subdirectory() {
        assert_eq!(
            parse_github_repo("git::https://github.com/acme/modules.git//vpc?ref=v2.0.0"),
            Some(("acme".to_string(), "modules".to_string()))
        );
    }

    #[test]
    fn test_parse_non_github_source() {
        assert_eq!(
            parse_github_repo("git::https://gitlab.com/acme/network.git?ref=v1"),
            None
        );
    }

    #[test]
    fn test_build_url() {
        let adapter = GitHubTagsAdapter::new(HttpClient::new().unwrap());
        assert_eq!(
            adapter.build_url("acme", "network"),
            "https://api.github.com/repos/acme/network/tags?per_page=100"
        );
    }

    #[tokio::test]
    async fn test_unsupported_source() {
        let adapter = GitHubTagsAdapter::new(HttpClient::new().unwrap());
        let err = adapter
            .fetch_versions("git::https://bitbucket.org/acme/network.git?ref=v1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnsupportedSource {
                kind: TargetKind::ModuleGit,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_tags() {
        let json = r#"[{"name": "v1.2.0", "commit": {"sha": "abc"}}, {"name": "v1.1.0"}]"#;
        let tags: Vec<Tag> = serde_json::from_str(json).unwrap();
        let names: Vec<_> = tags.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["v1.2.0", "v1.1.0"]);
    }
}
