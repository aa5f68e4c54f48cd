//! Logbook Core - Core library for changelog maintenance
//!
//! This crate provides the error taxonomy, configuration, changelog discovery
//! and shared types used by the other logbook crates.

pub mod config;
pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{relative_to, ChangelogDiscovery};
pub use error::{LogbookError, Result};
pub use types::RepoSlug;
