//! # contract: interfaces between the tracker and the outside world
//!
//! The tracker talks to three collaborators:
//! - a hosted source-control service ([`RepoHost`]), e.g. the GitHub REST API,
//! - the user, through a free-text prompt ([`SummaryPrompt`]),
//! - the user again, through one-line notifications ([`Notifier`]).
//!
//! Concrete implementations live in the CLI crate. The traits are annotated for
//! `mockall` so tests can drive the commit routine and the tracking session
//! without a network or a terminal.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

/// Repository metadata as returned by the hosted service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// A file that already exists at some path in a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub path: String,
    /// Blob sha; passed back as the prior revision id when updating the file.
    pub sha: String,
}

/// Create-or-update request for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutFile {
    pub path: String,
    pub message: String,
    /// Standard base64 of the file bytes.
    pub content_base64: String,
    /// Prior revision id. `None` creates the file.
    pub sha: Option<String>,
    pub branch: Option<String>,
}

/// Result of a successful create-or-update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    pub path: String,
    /// Blob sha of the written file.
    pub sha: String,
    pub commit_sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Not Found")]
    NotFound,
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Operations needed from the hosted source-control service.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Read repository metadata. A missing repository is [`HostError::NotFound`].
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, HostError>;

    /// Create a repository owned by the authenticated account.
    async fn create_repository(&self, name: &str, private: bool)
        -> Result<Repository, HostError>;

    /// Read the file at `path` on the default branch.
    async fn get_file(&self, owner: &str, repo: &str, path: &str)
        -> Result<RemoteFile, HostError>;

    /// Create or update the file described by `req` with a single commit.
    async fn put_file(&self, owner: &str, repo: &str, req: PutFile)
        -> Result<CommitInfo, HostError>;
}

/// What to ask the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub prompt: String,
    pub placeholder: String,
    pub multiline: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// Free-text input from the user.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SummaryPrompt: Send + Sync {
    /// Ask once. `Ok(None)` means the user dismissed the prompt.
    async fn ask(&self, request: &PromptRequest) -> Result<Option<String>, PromptError>;
}

/// User-facing notifications.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}
