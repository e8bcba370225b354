/// `load_config` module: merges the optional YAML settings file, the
/// environment secrets and the command-line flags into one [`TrackerConfig`].
///
/// # Sources, lowest precedence first
/// - built-in defaults (30 minute interval, `logs/`, local branch `main`,
///   uploads to the remote default branch, github.com)
/// - the YAML file given with `--config` (no secrets)
/// - command-line flags
///
/// `GITHUB_TOKEN` and `GITHUB_USER` are always read from the environment;
/// `.env` files are loaded by `main` before this runs.
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{bail, Context, Result};
use git_tracker_core::tracker::{TrackerSettings, MAX_INTERVAL};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

use crate::github::{DEFAULT_API_BASE_URL, TOKEN_ENV};

pub const USER_ENV: &str = "GITHUB_USER";

/// Non-secret settings accepted in the YAML file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub interval_minutes: Option<u64>,
    pub logs_dir: Option<String>,
    pub branch: Option<String>,
    pub upload_branch: Option<String>,
    pub api_base_url: Option<String>,
    pub remote_base: Option<String>,
    pub create_missing_repo: Option<bool>,
    pub private: Option<bool>,
}

/// Values given on the command line; `None`/`false` leaves the file value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub interval_minutes: Option<u64>,
    pub create_repo: bool,
}

#[derive(Debug)]
pub struct TrackerConfig {
    pub token: String,
    pub api_base_url: String,
    pub settings: TrackerSettings,
}

pub fn load_file_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e)
    })?;

    // An empty file is a valid, all-defaults config.
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    let parsed: FileConfig = serde_yaml::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML: {e}")
    })?;
    info!(config_path = ?path_ref, "Parsed config YAML successfully");
    Ok(parsed)
}

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            info!(var = name, "Found in environment");
            Ok(value)
        }
        Ok(_) => {
            error!(var = name, "Environment variable is empty");
            bail!("{name} environment variable is empty")
        }
        Err(e) => {
            error!(error = ?e, var = name, "Environment variable not set");
            Err(e).with_context(|| format!("{name} environment variable not set"))
        }
    }
}

/// `minutes` as a timer period, between one minute and [`MAX_INTERVAL`].
pub fn interval_from_minutes(minutes: u64) -> Result<Duration> {
    let max_minutes = MAX_INTERVAL.as_secs() / 60;
    match minutes.checked_mul(60) {
        Some(secs) if minutes >= 1 && minutes <= max_minutes => Ok(Duration::from_secs(secs)),
        _ => {
            error!(minutes, max_minutes, "interval_minutes out of range");
            bail!("interval_minutes must be between 1 and {max_minutes}, got {minutes}")
        }
    }
}

pub fn load_config(
    path: Option<&Path>,
    workspace: PathBuf,
    overrides: &Overrides,
) -> Result<TrackerConfig> {
    let file = match path {
        Some(p) => load_file_config(p)?,
        None => FileConfig::default(),
    };

    let token = required_env(TOKEN_ENV)?;
    let user = required_env(USER_ENV)?;

    let mut settings = TrackerSettings::new(user, workspace);

    let minutes = overrides.interval_minutes.or(file.interval_minutes);
    if let Some(minutes) = minutes {
        settings.interval = interval_from_minutes(minutes)?;
    }
    if let Some(logs_dir) = file.logs_dir {
        settings.logs_dir = logs_dir;
    }
    if let Some(branch) = file.branch {
        settings.branch = branch;
    }
    if let Some(upload_branch) = file.upload_branch {
        settings.upload_branch = Some(upload_branch);
    }
    if let Some(remote_base) = file.remote_base {
        settings.remote_base = remote_base;
    }
    if let Some(private) = file.private {
        settings.private = private;
    }
    settings.create_missing_repo = overrides.create_repo || file.create_missing_repo.unwrap_or(false);

    let api_base_url = file
        .api_base_url
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    info!(
        owner = %settings.owner,
        api_base_url = %api_base_url,
        interval_secs = settings.interval.as_secs(),
        "Config loaded and merged successfully"
    );

    Ok(TrackerConfig {
        token,
        api_base_url,
        settings,
    })
}
