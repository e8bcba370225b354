//! Local clone bootstrap: make sure `<path>` is a git repository on the tracker
//! branch with `origin` pointing at the tracker remote.
//!
//! Everything goes through the `git` binary on `PATH`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, error, info};

pub const DEFAULT_BRANCH: &str = "main";
pub const REMOTE_NAME: &str = "origin";

#[derive(Debug, thiserror::Error)]
pub enum LocalRepoError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to launch git {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("git {command} exited with {status}: {stderr}")]
    Git {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Output of a git invocation that exited with status 0.
struct GitOutput {
    stdout: String,
}

fn git(repo: &Path, args: &[&str]) -> Result<GitOutput, LocalRepoError> {
    let command = args.join(" ");
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .map_err(|e| {
            error!(error = ?e, command = %command, path = %repo.display(), "Failed to launch git process");
            LocalRepoError::Launch {
                command: command.clone(),
                source: e,
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        error!(
            command = %command,
            path = %repo.display(),
            status = %output.status,
            stderr = %stderr,
            "Git exited with non-zero code"
        );
        return Err(LocalRepoError::Git {
            command,
            status: output.status.to_string(),
            stderr,
        });
    }

    debug!(command = %command, path = %repo.display(), "git succeeded");
    Ok(GitOutput {
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
    })
}

/// Current URL of `remote`, or `None` when the remote is not registered.
pub fn remote_url(repo: &Path, remote: &str) -> Result<Option<String>, LocalRepoError> {
    let listed = git(repo, &["remote"])?;
    if !listed.stdout.lines().any(|line| line.trim() == remote) {
        return Ok(None);
    }
    let url = git(repo, &["remote", "get-url", remote])?;
    Ok(Some(url.stdout))
}

/// Whether HEAD points at a commit. A non-zero exit from `rev-parse` means an
/// unborn branch; only a failure to launch git is an error.
pub fn has_commits(repo: &Path) -> Result<bool, LocalRepoError> {
    let command = "rev-parse --verify --quiet HEAD";
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(command.split(' '))
        .output()
        .map_err(|e| {
            error!(error = ?e, command = %command, path = %repo.display(), "Failed to launch git process");
            LocalRepoError::Launch {
                command: command.to_string(),
                source: e,
            }
        })?;
    Ok(output.status.success())
}

/// `git branch -M <branch>`. Older git refuses to rename a branch with no
/// commits, so an unborn HEAD is repointed directly instead.
fn rename_branch(repo: &Path, branch: &str) -> Result<(), LocalRepoError> {
    if has_commits(repo)? {
        git(repo, &["branch", "-M", branch])?;
    } else {
        let head = format!("refs/heads/{branch}");
        git(repo, &["symbolic-ref", "HEAD", &head])?;
    }
    Ok(())
}

/// Prepare the local clone at `path`:
/// create the directory, `git init`, rename the current branch to `branch`
/// and register `origin` as `remote`.
///
/// Running it again on an existing clone is harmless; an `origin` with a
/// different URL is repointed.
pub fn bootstrap(path: &Path, remote: &str, branch: &str) -> Result<(), LocalRepoError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Failed to create local repository directory");
            LocalRepoError::CreateDir {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
        debug!(path = %path.display(), "Created local repository directory");
    }

    git(path, &["init"])?;
    rename_branch(path, branch)?;

    match remote_url(path, REMOTE_NAME)? {
        None => {
            git(path, &["remote", "add", REMOTE_NAME, remote])?;
            info!(remote = %remote, "Registered remote");
        }
        Some(existing) if existing == remote => {
            debug!(remote = %remote, "Remote already registered");
        }
        Some(existing) => {
            git(path, &["remote", "set-url", REMOTE_NAME, remote])?;
            info!(previous = %existing, remote = %remote, "Updated remote URL");
        }
    }

    info!(path = %path.display(), branch = %branch, "Local repository ready");
    Ok(())
}
