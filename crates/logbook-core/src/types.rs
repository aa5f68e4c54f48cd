//! Core types for logbook

use serde::{Deserialize, Serialize};

/// A GitHub repository identified as `owner/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoSlug {
    /// Account or organization owning the repository
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoSlug {
    /// Create a new slug
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Web URL of a pull request in this repository
    pub fn pull_url(&self, number: u64) -> String {
        format!(
            "https://github.com/{}/{}/pull/{}",
            self.owner, self.name, number
        )
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepoSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| format!("Expected 'owner/name', got: {}", s))?;

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(format!("Expected 'owner/name', got: {}", s));
        }

        Ok(Self::new(owner, name))
    }
}
