//! Logbook Git - Git operations for changelog maintenance
//!
//! This crate scopes commit history to a changelog's directory, prepares
//! changelog branches and commits, and finds changelogs changed between two
//! revisions.

mod branches;
mod changes;
mod commits;
mod remote;
mod repository;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use remote::{git_push_upstream, slug_from_remote_url};
pub use repository::{GitRepo, Result};
pub use types::CommitLog;
