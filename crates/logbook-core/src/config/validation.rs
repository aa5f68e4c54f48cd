//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::types::RepoSlug;

use super::types::Config;

/// Longest accepted lookback window, about a century
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_discovery(config)?;
    validate_schedule(config)?;
    validate_git(config)?;
    validate_github(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}

fn validate_discovery(config: &Config) -> Result<()> {
    if config.discovery.include.is_empty() {
        return Err(invalid("discovery.include", "at least one pattern is required").into());
    }

    Ok(())
}

fn validate_schedule(config: &Config) -> Result<()> {
    if config.schedule.lookback_days <= 0 {
        return Err(invalid("schedule.lookback_days", "must be a positive number of days").into());
    }

    if config.schedule.lookback_days > MAX_LOOKBACK_DAYS {
        return Err(invalid(
            "schedule.lookback_days",
            format!("must be at most {} days", MAX_LOOKBACK_DAYS),
        )
        .into());
    }

    Ok(())
}

fn validate_git(config: &Config) -> Result<()> {
    if config.git.remote.is_empty() {
        return Err(invalid("git.remote", "remote cannot be empty").into());
    }

    if config.git.base_branch.is_empty() {
        return Err(invalid("git.base_branch", "branch cannot be empty").into());
    }

    if config.git.commit_message.trim().is_empty() {
        return Err(invalid("git.commit_message", "commit message cannot be empty").into());
    }

    Ok(())
}

fn validate_github(config: &Config) -> Result<()> {
    if let Err(e) = url::Url::parse(&config.github.api_url) {
        return Err(invalid("github.api_url", e.to_string()).into());
    }

    if let Some(repository) = &config.github.repository {
        repository
            .parse::<RepoSlug>()
            .map_err(|message| invalid("github.repository", message))?;
    }

    Ok(())
}
