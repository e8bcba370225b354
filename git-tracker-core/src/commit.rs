//! One timer tick: prompt → encode → upload.
//!
//! [`commit_summary`] asks for a summary, names it after the current instant,
//! looks up any prior revision at that path and writes the file through the
//! [`RepoHost`] in a single commit. Each failure is reported to the user through
//! the [`Notifier`] before it is returned; nothing is retried.

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::contract::{CommitInfo, HostError, Notifier, PutFile, RepoHost, SummaryPrompt};
use crate::error::TrackerError;
use crate::summary::{
    commit_message, encode_content, format_timestamp, generate_summary_content, summary_path,
};

/// Where a tick writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTarget {
    pub owner: String,
    pub repo: String,
    pub logs_dir: String,
    /// `None` writes to the repository's default branch.
    pub branch: Option<String>,
}

/// Prior revision id of `path`, `None` when the file does not exist yet.
pub async fn prior_revision<H>(
    host: &H,
    target: &CommitTarget,
    path: &str,
) -> Result<Option<String>, HostError>
where
    H: RepoHost + ?Sized,
{
    match host.get_file(&target.owner, &target.repo, path).await {
        Ok(file) => Ok(Some(file.sha)),
        Err(HostError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn commit_summary<H, P, N>(
    host: &H,
    prompt: &P,
    notifier: &N,
    target: &CommitTarget,
    now: DateTime<Utc>,
) -> Result<CommitInfo, TrackerError>
where
    H: RepoHost + ?Sized,
    P: SummaryPrompt + ?Sized,
    N: Notifier + ?Sized,
{
    let result = write_summary(host, prompt, notifier, target, now).await;
    match &result {
        Ok(commit) => {
            info!(path = %commit.path, commit_sha = %commit.commit_sha, "Summary committed");
            notifier.info("Changes committed successfully");
        }
        Err(e @ TrackerError::FileLookup(_)) => {
            notifier.error(&e.to_string());
        }
        Err(e) => {
            let message = match e {
                TrackerError::Commit(inner) => inner.to_string(),
                other => other.to_string(),
            };
            notifier.error(&format!(
                "An error occurred while committing changes: {message}"
            ));
        }
    }
    result
}

async fn write_summary<H, P, N>(
    host: &H,
    prompt: &P,
    notifier: &N,
    target: &CommitTarget,
    now: DateTime<Utc>,
) -> Result<CommitInfo, TrackerError>
where
    H: RepoHost + ?Sized,
    P: SummaryPrompt + ?Sized,
    N: Notifier + ?Sized,
{
    let content = generate_summary_content(prompt, notifier).await?;

    let timestamp = format_timestamp(now);
    let path = summary_path(&target.logs_dir, &timestamp);
    info!(owner = %target.owner, repo = %target.repo, path = %path, "Committing summary");

    let sha = prior_revision(host, target, &path).await.map_err(|e| {
        error!(error = ?e, path = %path, "Failed to look up existing file");
        TrackerError::FileLookup(e)
    })?;

    let req = PutFile {
        path: path.clone(),
        message: commit_message(&timestamp),
        content_base64: encode_content(&content),
        sha,
        branch: target.branch.clone(),
    };

    host.put_file(&target.owner, &target.repo, req)
        .await
        .map_err(|e| {
            error!(error = ?e, path = %path, "Create-or-update file failed");
            TrackerError::Commit(e)
        })
}
