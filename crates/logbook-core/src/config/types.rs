//! Configuration types

use serde::{Deserialize, Serialize};

/// Main configuration for logbook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Changelog discovery configuration
    pub discovery: DiscoveryConfig,

    /// Run scheduling configuration
    pub schedule: ScheduleConfig,

    /// Git configuration
    pub git: GitConfig,

    /// Pull request configuration
    pub pull_request: PullRequestConfig,

    /// GitHub API configuration
    pub github: GitHubConfig,

    /// Slack notification configuration
    pub slack: SlackConfig,
}

/// Changelog discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Glob patterns (relative to the repository root) selecting changelogs
    pub include: Vec<String>,

    /// Glob patterns excluding files or whole directories
    pub exclude: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            include: vec!["*/**/CHANGELOG.md".to_string()],
            exclude: vec!["**/node_modules".to_string(), "**/.git".to_string()],
        }
    }
}

/// Run scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// How far back to look when a changelog has never been updated
    pub lookback_days: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { lookback_days: 7 }
    }
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Remote name
    pub remote: String,

    /// Branch the changelog branches are created from
    pub base_branch: String,

    /// Name used for changelog commits
    pub author_name: String,

    /// Email used for changelog commits
    pub author_email: String,

    /// Commit message for changelog commits
    pub commit_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            base_branch: "main".to_string(),
            author_name: "Changelog Bot".to_string(),
            author_email: "changelog-bot@users.noreply.github.com".to_string(),
            commit_message: "Update Changelog.".to_string(),
        }
    }
}

/// Pull request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestConfig {
    /// Label applied to changelog pull requests
    pub label: String,

    /// Whether maintainers may push to the changelog branch
    pub maintainer_can_modify: bool,
}

impl Default for PullRequestConfig {
    fn default() -> Self {
        Self {
            label: "Changelog".to_string(),
            maintainer_can_modify: true,
        }
    }
}

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API base URL
    pub api_url: String,

    /// Repository slug (`owner/name`); `GITHUB_REPOSITORY` takes precedence
    pub repository: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            repository: None,
        }
    }
}

/// Slack notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Display name of the bot
    pub username: String,

    /// Emoji used as the bot avatar
    pub icon_emoji: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            username: "Changelog Bot".to_string(),
            icon_emoji: ":newspaper:".to_string(),
        }
    }
}
