//! # git-tracker CLI Interface (Module)
//!
//! Command parsing and the async [`run`] entrypoint. The tracker logic itself
//! lives in `git-tracker-core`; this module wires the GitHub client, the
//! terminal prompt and the console notifier into it.
//!
//! ## Commands
//! - `start`: check the tracker repository, bootstrap the local clone, then
//!   prompt and commit on a timer until Ctrl-C.
//! - `commit`: prompt and commit once, now.
//! - `check`: report whether the tracker repository exists.
use crate::github::GitHubClient;
use crate::load_config::{load_config, Overrides, TrackerConfig};
use crate::terminal::{ConsoleNotifier, TerminalPrompt};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use git_tracker_core::tracker::{check_repository, project_name, tracker_repo_name, RepoStatus, Tracker};
use std::path::PathBuf;

/// CLI for git-tracker: commit a work summary to GitHub on a timer.
#[derive(Parser, Debug)]
#[clap(
    name = "git-tracker",
    version,
    about = "Prompt for a work summary on a timer and commit it to a <project>-tracker GitHub repository"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct Common {
    /// Project folder; its name selects the <name>-tracker repository
    #[clap(long, default_value = ".")]
    pub workspace: PathBuf,
    /// Path to an optional YAML settings file
    #[clap(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start tracking: prompt for a summary and commit it every interval
    Start {
        #[clap(flatten)]
        common: Common,
        /// Minutes between prompts (default 30)
        #[clap(long)]
        interval_minutes: Option<u64>,
        /// Create the tracker repository on GitHub when it does not exist
        #[clap(long)]
        create_repo: bool,
    },
    /// Prompt for a summary and commit it once, now
    Commit {
        #[clap(flatten)]
        common: Common,
    },
    /// Report whether the tracker repository exists
    Check {
        #[clap(flatten)]
        common: Common,
    },
}

/// An explicit path like "." has no final component; resolve it first so
/// the project name comes from the real folder.
fn resolve_workspace(workspace: PathBuf) -> PathBuf {
    std::fs::canonicalize(&workspace).unwrap_or(workspace)
}

fn load(common: Common, overrides: &Overrides) -> Result<TrackerConfig> {
    let workspace = resolve_workspace(common.workspace);
    load_config(common.config.as_deref(), workspace, overrides)
}

fn client(config: &TrackerConfig) -> Result<GitHubClient> {
    GitHubClient::new(&config.token, &config.api_base_url).context("Failed to construct GitHub client")
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Start {
            common,
            interval_minutes,
            create_repo,
        } => {
            let overrides = Overrides {
                interval_minutes,
                create_repo,
            };
            let config = load(common, &overrides)?;
            let host = client(&config)?;
            tracing::info!(command = "start", "Starting tracker");

            let session = Tracker::start(config.settings, host, TerminalPrompt, ConsoleNotifier)
                .await
                .context("Failed to start tracking")?;
            println!(
                "Tracking {} every {} minute(s). Press Ctrl-C to stop.",
                session.target().repo,
                session.interval().as_secs() / 60
            );

            let ticks = session
                .run_until(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!(error = ?e, "Failed to listen for Ctrl-C");
                    }
                })
                .await;
            tracing::info!(command = "start", ticks, "Tracker stopped");
            Ok(())
        }
        Commands::Commit { common } => {
            let config = load(common, &Overrides::default())?;
            let host = client(&config)?;
            tracing::info!(command = "commit", "Committing summary once");

            let session = Tracker::attach(config.settings, host, TerminalPrompt, ConsoleNotifier)?;
            let commit = session.tick().await?;
            tracing::info!(command = "commit", path = %commit.path, commit_sha = %commit.commit_sha, "Commit complete");
            Ok(())
        }
        Commands::Check { common } => {
            let config = load(common, &Overrides::default())?;
            let host = client(&config)?;
            let notifier = ConsoleNotifier;

            let project = project_name(&config.settings.workspace)
                .context("Please open a project folder")?;
            let repo = tracker_repo_name(&project);
            match check_repository(&host, &notifier, &config.settings.owner, &repo).await {
                RepoStatus::Exists(_) | RepoStatus::Missing => Ok(()),
                RepoStatus::Unknown(e) => Err(anyhow::Error::new(e).context("Repository check failed")),
            }
        }
    }
}
