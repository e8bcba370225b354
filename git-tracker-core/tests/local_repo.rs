use std::fs;
use std::path::Path;

use git_tracker_core::local_repo::{bootstrap, has_commits, remote_url, LocalRepoError};
use tempfile::tempdir;

fn head_ref(repo: &Path) -> String {
    fs::read_to_string(repo.join(".git").join("HEAD"))
        .expect("HEAD readable")
        .trim()
        .to_string()
}

#[test]
fn bootstrap_creates_directory_repository_branch_and_remote() {
    let tmp = tempdir().unwrap();
    let repo = tmp.path().join("nested").join("notes-tracker");
    let remote = "https://github.com/alice/notes-tracker.git";

    bootstrap(&repo, remote, "main").expect("bootstrap should succeed");

    assert!(repo.join(".git").is_dir(), "repository should be initialised");
    assert_eq!(head_ref(&repo), "ref: refs/heads/main");
    assert_eq!(
        remote_url(&repo, "origin").unwrap().as_deref(),
        Some(remote)
    );
}

#[test]
fn bootstrap_twice_is_harmless() {
    let tmp = tempdir().unwrap();
    let repo = tmp.path().join("notes-tracker");
    let remote = "https://github.com/alice/notes-tracker.git";

    bootstrap(&repo, remote, "main").expect("first bootstrap");
    bootstrap(&repo, remote, "main").expect("second bootstrap");

    assert_eq!(remote_url(&repo, "origin").unwrap().as_deref(), Some(remote));
}

#[test]
fn bootstrap_repoints_a_stale_origin() {
    let tmp = tempdir().unwrap();
    let repo = tmp.path().join("notes-tracker");

    bootstrap(&repo, "https://github.com/YOUR_GITHUB_USERNAME/notes-tracker.git", "main")
        .expect("first bootstrap");
    bootstrap(&repo, "https://github.com/alice/notes-tracker.git", "trunk")
        .expect("second bootstrap");

    assert_eq!(
        remote_url(&repo, "origin").unwrap().as_deref(),
        Some("https://github.com/alice/notes-tracker.git")
    );
    assert_eq!(head_ref(&repo), "ref: refs/heads/trunk");
}

#[test]
fn remote_url_is_none_without_origin() {
    let tmp = tempdir().unwrap();
    let status = std::process::Command::new("git")
        .arg("-C")
        .arg(tmp.path())
        .arg("init")
        .status()
        .expect("git runs");
    assert!(status.success());

    assert_eq!(remote_url(tmp.path(), "origin").unwrap(), None);
}

#[test]
fn bootstrap_fails_when_path_is_a_file() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("not-a-dir");
    fs::write(&file, "x").unwrap();

    let result = bootstrap(&file, "https://github.com/alice/x.git", "main");
    assert!(
        matches!(result, Err(LocalRepoError::Git { .. }) | Err(LocalRepoError::Launch { .. })),
        "expected a git failure, got {result:?}"
    );
}

#[test]
fn has_commits_tracks_an_unborn_head() {
    let tmp = tempdir().unwrap();
    let repo = tmp.path().join("notes-tracker");
    bootstrap(&repo, "https://github.com/alice/notes-tracker.git", "main").unwrap();

    assert!(!has_commits(&repo).unwrap());

    let status = std::process::Command::new("git")
        .arg("-C")
        .arg(&repo)
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "commit",
            "--allow-empty",
            "-m",
            "first",
        ])
        .status()
        .expect("git runs");
    assert!(status.success());

    assert!(has_commits(&repo).unwrap());
    // Renaming a branch that has commits goes through `git branch -M`.
    bootstrap(&repo, "https://github.com/alice/notes-tracker.git", "trunk").unwrap();
    assert_eq!(head_ref(&repo), "ref: refs/heads/trunk");
}
