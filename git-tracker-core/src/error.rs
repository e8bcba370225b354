use crate::contract::HostError;
use crate::local_repo::LocalRepoError;

/// Failures of the tracker's own operations. The `Display` text is what the
/// user sees in a notification.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Please open a project folder")]
    NoProject,
    #[error("No summary content provided")]
    EmptySummary,
    #[error("An error occurred while generating the summary content: {0}")]
    Prompt(String),
    #[error("An error occurred while getting the file: {0}")]
    FileLookup(HostError),
    #[error("An error occurred while committing changes: {0}")]
    Commit(HostError),
    #[error(transparent)]
    LocalRepo(#[from] LocalRepoError),
}
