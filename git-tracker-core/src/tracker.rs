//! Start-tracking command and the timer loop it leaves running.
//!
//! [`Tracker::start`] resolves the project from the workspace directory,
//! checks whether `<project>-tracker` exists on the hosted service, prepares
//! the local clone and hands back a [`TrackingSession`]. The session fires
//! [`commit_summary`] on a fixed interval until it is stopped.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::commit::{commit_summary, CommitTarget};
use crate::contract::{CommitInfo, HostError, Notifier, RepoHost, Repository, SummaryPrompt};
use crate::error::TrackerError;
use crate::local_repo;
use crate::summary::DEFAULT_LOGS_DIR;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30 * 60);
/// Bounds applied to the timer period.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);
pub const DEFAULT_REMOTE_BASE: &str = "https://github.com";
pub const TRACKER_SUFFIX: &str = "-tracker";

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    /// Account that owns the tracker repository.
    pub owner: String,
    /// Open project folder; its last component names the project.
    pub workspace: PathBuf,
    pub logs_dir: String,
    /// Branch of the local clone.
    pub branch: String,
    /// Branch uploads are committed to; `None` uses the remote default branch.
    pub upload_branch: Option<String>,
    pub interval: Duration,
    pub create_missing_repo: bool,
    pub private: bool,
    /// Web base of the hosted service, used to build the `origin` URL.
    pub remote_base: String,
}

impl TrackerSettings {
    pub fn new(owner: impl Into<String>, workspace: impl Into<PathBuf>) -> Self {
        Self {
            owner: owner.into(),
            workspace: workspace.into(),
            logs_dir: DEFAULT_LOGS_DIR.to_string(),
            branch: local_repo::DEFAULT_BRANCH.to_string(),
            upload_branch: None,
            interval: DEFAULT_INTERVAL,
            create_missing_repo: false,
            private: true,
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            owner = %self.owner,
            workspace = %self.workspace.display(),
            logs_dir = %self.logs_dir,
            branch = %self.branch,
            upload_branch = ?self.upload_branch,
            interval_secs = self.interval.as_secs(),
            create_missing_repo = self.create_missing_repo,
            "Loaded tracker settings"
        );
    }
}

/// Name of the open project: the final component of the workspace path.
pub fn project_name(workspace: &Path) -> Option<String> {
    workspace
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

pub fn tracker_repo_name(project: &str) -> String {
    format!("{project}{TRACKER_SUFFIX}")
}

pub fn remote_url(remote_base: &str, owner: &str, repo: &str) -> String {
    format!("{}/{owner}/{repo}.git", remote_base.trim_end_matches('/'))
}

/// Outcome of the repository-existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoStatus {
    Exists(Repository),
    Missing,
    /// The check itself failed; existence is unknown.
    Unknown(HostError),
}

/// Check whether `owner/repo` exists and tell the user what was found.
pub async fn check_repository<H, N>(host: &H, notifier: &N, owner: &str, repo: &str) -> RepoStatus
where
    H: RepoHost + ?Sized,
    N: Notifier + ?Sized,
{
    match host.get_repository(owner, repo).await {
        Ok(found) => {
            info!(repo = %repo, "Tracker repository exists");
            notifier.info(&format!("Repository {repo} already exists."));
            RepoStatus::Exists(found)
        }
        Err(HostError::NotFound) => {
            info!(repo = %repo, "Tracker repository does not exist");
            notifier.info(&format!("Repository {repo} does not exist."));
            RepoStatus::Missing
        }
        Err(e) => {
            error!(error = ?e, repo = %repo, "Repository check failed");
            notifier.error(&format!(
                "An error occurred while checking the repository. Checking Repo: {e}"
            ));
            RepoStatus::Unknown(e)
        }
    }
}

pub struct Tracker;

impl Tracker {
    /// Run the start-tracking command.
    ///
    /// The repository check never aborts the start; only a missing project or
    /// a failed local bootstrap does.
    pub async fn start<H, P, N>(
        settings: TrackerSettings,
        host: H,
        prompt: P,
        notifier: N,
    ) -> Result<TrackingSession<H, P, N>, TrackerError>
    where
        H: RepoHost,
        P: SummaryPrompt,
        N: Notifier,
    {
        settings.trace_loaded();

        let Some(project) = project_name(&settings.workspace) else {
            error!(workspace = %settings.workspace.display(), "No project folder open");
            notifier.error(&TrackerError::NoProject.to_string());
            return Err(TrackerError::NoProject);
        };
        let repo = tracker_repo_name(&project);

        let status = check_repository(&host, &notifier, &settings.owner, &repo).await;
        if status == RepoStatus::Missing && settings.create_missing_repo {
            match host.create_repository(&repo, settings.private).await {
                Ok(created) => {
                    info!(repo = %created.full_name, "Created tracker repository");
                    notifier.info(&format!("Repository {repo} created."));
                }
                Err(e) => {
                    error!(error = ?e, repo = %repo, "Failed to create tracker repository");
                    notifier.error(&format!(
                        "An error occurred while creating the repository: {e}"
                    ));
                }
            }
        }

        let repo_path = settings.workspace.join(&repo);
        let remote = remote_url(&settings.remote_base, &settings.owner, &repo);
        if let Err(e) = local_repo::bootstrap(&repo_path, &remote, &settings.branch) {
            notifier.error(&format!(
                "An error occurred while creating the local repository: {e}"
            ));
            return Err(e.into());
        }

        let target = CommitTarget {
            owner: settings.owner.clone(),
            repo,
            logs_dir: settings.logs_dir.clone(),
            branch: settings.upload_branch.clone(),
        };

        info!(
            repo = %target.repo,
            path = %repo_path.display(),
            interval_secs = settings.interval.as_secs(),
            "Tracking started"
        );

        Ok(TrackingSession {
            host,
            prompt,
            notifier,
            target,
            repo_path,
            interval: settings.interval,
        })
    }

    /// Session for a tracker that was started before: no repository check and
    /// no local bootstrap.
    pub fn attach<H, P, N>(
        settings: TrackerSettings,
        host: H,
        prompt: P,
        notifier: N,
    ) -> Result<TrackingSession<H, P, N>, TrackerError>
    where
        H: RepoHost,
        P: SummaryPrompt,
        N: Notifier,
    {
        let Some(project) = project_name(&settings.workspace) else {
            notifier.error(&TrackerError::NoProject.to_string());
            return Err(TrackerError::NoProject);
        };
        let repo = tracker_repo_name(&project);
        let repo_path = settings.workspace.join(&repo);

        Ok(TrackingSession {
            host,
            prompt,
            notifier,
            target: CommitTarget {
                owner: settings.owner,
                repo,
                logs_dir: settings.logs_dir,
                branch: settings.upload_branch,
            },
            repo_path,
            interval: settings.interval,
        })
    }
}

/// A started tracker: owns the service handles and fires one commit per
/// interval.
pub struct TrackingSession<H, P, N> {
    host: H,
    prompt: P,
    notifier: N,
    target: CommitTarget,
    repo_path: PathBuf,
    interval: Duration,
}

impl<H, P, N> TrackingSession<H, P, N>
where
    H: RepoHost,
    P: SummaryPrompt,
    N: Notifier,
{
    pub fn target(&self) -> &CommitTarget {
        &self.target
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Prompt and commit once, now.
    pub async fn tick(&self) -> Result<CommitInfo, TrackerError> {
        commit_summary(
            &self.host,
            &self.prompt,
            &self.notifier,
            &self.target,
            Utc::now(),
        )
        .await
    }

    /// Commit every interval, forever. The first commit happens one full
    /// interval after the call.
    pub async fn run(self) {
        self.run_until(std::future::pending::<()>()).await;
    }

    /// Like [`run`](Self::run), but returns once `shutdown` resolves, even
    /// in the middle of a tick (an unanswered prompt is abandoned).
    /// Returns the number of ticks fired.
    ///
    /// The period is clamped to [`MIN_INTERVAL`]..=[`MAX_INTERVAL`].
    pub async fn run_until<F>(self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let period = self.interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        let now = Instant::now();
        let mut timer = interval_at(now.checked_add(period).unwrap_or(now), period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut ticks = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(ticks, "Tracking stopped");
                    return ticks;
                }
                _ = timer.tick() => {
                    ticks += 1;
                    let tick = self.tick();
                    tokio::pin!(tick);
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => {
                            warn!(tick = ticks, "Tracking stopped during a tick");
                            return ticks;
                        }
                        result = &mut tick => {
                            if let Err(e) = result {
                                warn!(error = %e, tick = ticks, "Commit tick failed");
                            }
                        }
                    }
                }
            }
        }
    }
}
