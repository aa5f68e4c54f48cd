//! Git types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit relevant to a changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitLog {
    /// Commit hash (full)
    pub hash: String,
    /// Short hash (first 7 characters)
    pub short_hash: String,
    /// Commit title (first line of the message)
    pub title: String,
    /// Committer timestamp
    pub timestamp: DateTime<Utc>,
}

impl CommitLog {
    /// Create a new CommitLog
    pub fn new(hash: impl Into<String>, title: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        let hash = hash.into();
        let short_hash = hash.chars().take(7).collect();

        Self {
            hash,
            short_hash,
            title: title.into(),
            timestamp,
        }
    }
}
