// Runs in its own test binary: it empties PATH for the whole process.

use git_tracker_core::local_repo::{has_commits, LocalRepoError};
use tempfile::tempdir;

#[test]
fn missing_git_binary_is_a_launch_error() {
    let tmp = tempdir().unwrap();
    let empty_bin = tempdir().unwrap();
    std::env::set_var("PATH", empty_bin.path());

    let result = has_commits(tmp.path());

    match result {
        Err(LocalRepoError::Launch { command, .. }) => {
            assert_eq!(command, "rev-parse --verify --quiet HEAD");
        }
        other => panic!("expected a launch error, got {other:?}"),
    }
}
