//! GitHub REST v3 implementation of [`GitHost`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{GitHost, PendingTreeChange, RemoteTree};
use crate::config::RepoTarget;
use crate::utils::{Result, SyncError, UpstreamError};

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

#[derive(Deserialize)]
struct BranchResponse {
    commit: ShaRef,
}

#[derive(Deserialize)]
struct ShaRef {
    sha: String,
}

/// Authenticated client bound to one repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    repo_url: String,
}

impl GitHubClient {
    pub fn new(target: &RepoTarget) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", target.token))
            .map_err(|_| SyncError::Config("GITHUB_TOKEN contains invalid characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));

        let http = Client::builder()
            .user_agent(concat!("content-sync/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            repo_url: format!(
                "{}/repos/{}",
                target.api_url.trim_end_matches('/'),
                target.repository
            ),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.repo_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, UpstreamError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, UpstreamError> {
        Ok(self.send(request).await?.json::<T>().await?)
    }
}

#[async_trait]
impl GitHost for GitHubClient {
    async fn branch_head(&self, branch: &str) -> std::result::Result<String, UpstreamError> {
        let url = self.url(&format!("/branches/{}", branch));
        debug!("GET {}", url);
        let branch: BranchResponse = self.send_json(self.http.get(url)).await?;
        Ok(branch.commit.sha)
    }

    async fn fetch_tree(&self, commit_sha: &str) -> std::result::Result<RemoteTree, UpstreamError> {
        let url = self.url(&format!("/git/trees/{}?recursive=1", commit_sha));
        debug!("GET {}", url);
        self.send_json(self.http.get(url)).await
    }

    async fn create_tree(
        &self,
        base_tree: &str,
        changes: &[PendingTreeChange],
    ) -> std::result::Result<String, UpstreamError> {
        let url = self.url("/git/trees");
        debug!("POST {} ({} entries)", url, changes.len());
        let body = json!({ "base_tree": base_tree, "tree": changes });
        let tree: ShaRef = self.send_json(self.http.post(url).json(&body)).await?;
        Ok(tree.sha)
    }

    async fn create_commit(
        &self,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
    ) -> std::result::Result<String, UpstreamError> {
        let url = self.url("/git/commits");
        debug!("POST {}", url);
        let body = json!({
            "message": message,
            "tree": tree_sha,
            "parents": [parent_sha],
        });
        let commit: ShaRef = self.send_json(self.http.post(url).json(&body)).await?;
        Ok(commit.sha)
    }

    async fn update_ref(&self, branch: &str, commit_sha: &str) -> std::result::Result<(), UpstreamError> {
        let url = self.url(&format!("/git/refs/heads/{}", branch));
        debug!("PATCH {}", url);
        let body = json!({ "sha": commit_sha });
        self.send(self.http.patch(url).json(&body)).await?;
        Ok(())
    }
}
