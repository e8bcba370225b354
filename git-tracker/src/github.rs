#![doc = "GitHub integration for CLI and core: implements the `RepoHost` trait against the GitHub REST API."]
//
//! # GitHub client (CLI <-> Core)
//!
//! Bridges [`git_tracker_core::contract::RepoHost`] to the GitHub REST v3 API
//! over `reqwest`. Only the handful of endpoints the tracker needs are covered:
//! repository metadata, repository creation, and the contents API.
//!
//! ## Client Usage
//!
//! - Construct [`GitHubClient`] with [`GitHubClient::new`]; the CLI reads the
//!   token from `GITHUB_TOKEN` in `load_config`.
//! - The base URL defaults to `https://api.github.com`; tests point it at a
//!   local mock server.
//!
//! A 404 becomes [`HostError::NotFound`], 401/403 become
//! [`HostError::Unauthorized`], and any other non-2xx status becomes
//! [`HostError::Api`] carrying GitHub's `message`.

use async_trait::async_trait;
use git_tracker_core::contract::{
    CommitInfo, HostError, PutFile, RemoteFile, RepoHost, Repository,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
const API_VERSION: &str = "2022-11-28";

pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Serialize)]
struct CreateRepoBody<'a> {
    name: &'a str,
    private: bool,
    auto_init: bool,
}

#[derive(Serialize)]
struct PutContentsBody<'a> {
    message: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutContentsResponse {
    content: ContentRef,
    commit: CommitRef,
}

#[derive(Deserialize)]
struct ContentRef {
    path: String,
    sha: String,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

impl GitHubClient {
    pub fn new(token: &str, base_url: &str) -> Result<Self, HostError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| HostError::Unauthorized(format!("invalid token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("git-tracker"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| HostError::Transport(e.to_string()))?;

        tracing::info!(
            base_url = %base_url,
            token_set = !token.is_empty(),
            "Initialized GitHubClient"
        );
        Ok(GitHubClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        self.url(&format!(
            "/repos/{owner}/{repo}/contents/{}",
            path.trim_start_matches('/')
        ))
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Response, HostError> {
        let resp = req.send().await.map_err(|e| {
            tracing::error!(error = ?e, "GitHub request failed to send");
            HostError::Transport(e.to_string())
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or(text);
        tracing::debug!(status = status.as_u16(), message = %message, "GitHub returned an error status");

        Err(match status {
            StatusCode::NOT_FOUND => HostError::NotFound,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => HostError::Unauthorized(message),
            other => HostError::Api {
                status: other.as_u16(),
                message,
            },
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, HostError> {
        resp.json::<T>().await.map_err(|e| {
            tracing::error!(error = ?e, "Failed to decode GitHub response");
            HostError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, HostError> {
        tracing::info!(owner, repo, "Fetching repository");
        let resp = self
            .send(self.http.get(self.url(&format!("/repos/{owner}/{repo}"))))
            .await?;
        let found: Repository = Self::decode(resp).await?;
        tracing::info!(full_name = %found.full_name, "Fetched repository");
        Ok(found)
    }

    async fn create_repository(
        &self,
        name: &str,
        private: bool,
    ) -> Result<Repository, HostError> {
        tracing::info!(name, private, "Creating repository");
        let body = CreateRepoBody {
            name,
            private,
            auto_init: false,
        };
        let resp = self
            .send(self.http.post(self.url("/user/repos")).json(&body))
            .await?;
        let created: Repository = Self::decode(resp).await?;
        tracing::info!(full_name = %created.full_name, "Created repository");
        Ok(created)
    }

    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<RemoteFile, HostError> {
        tracing::info!(owner, repo, path, "Fetching file contents");
        let resp = self
            .send(self.http.get(self.contents_url(owner, repo, path)))
            .await?;
        // Directories come back as a JSON array and fail to decode here.
        Self::decode(resp).await
    }

    async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        req: PutFile,
    ) -> Result<CommitInfo, HostError> {
        tracing::info!(
            owner,
            repo,
            path = %req.path,
            has_sha = req.sha.is_some(),
            "Creating or updating file"
        );
        let body = PutContentsBody {
            message: &req.message,
            content: &req.content_base64,
            sha: req.sha.as_deref(),
            branch: req.branch.as_deref(),
        };
        let resp = self
            .send(
                self.http
                    .put(self.contents_url(owner, repo, &req.path))
                    .json(&body),
            )
            .await?;
        let written: PutContentsResponse = Self::decode(resp).await?;
        tracing::info!(
            path = %written.content.path,
            commit_sha = %written.commit.sha,
            "File written"
        );
        Ok(CommitInfo {
            path: written.content.path,
            sha: written.content.sha,
            commit_sha: written.commit.sha,
        })
    }
}
