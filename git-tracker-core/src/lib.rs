#![doc = "git-tracker-core: core logic library for git-tracker."]

//! Periodically ask the user what they worked on and commit the answer as a
//! timestamped file to a `<project>-tracker` repository on a hosted
//! source-control service, bootstrapping the local clone on demand.
//!
//! Service, prompt and notification backends are behind the traits in
//! [`contract`]; the CLI crate provides the real ones.

pub mod commit;
pub mod contract;
pub mod error;
pub mod local_repo;
pub mod summary;
pub mod tracker;

pub use error::TrackerError;
