//! Error types for logbook

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using LogbookError
pub type Result<T> = std::result::Result<T, LogbookError>;

/// Main error type for logbook operations
#[derive(Debug, Error)]
pub enum LogbookError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Changelog file errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Invalid glob pattern
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Repository has no working directory
    #[error("Repository has no working directory")]
    BareRepository,

    /// Branch not found locally or on the remote
    #[error("Branch not found: {0}")]
    BranchNotFound(String),

    /// Branch already exists
    #[error("Branch already exists: {0}")]
    BranchExists(String),

    /// Revision could not be resolved
    #[error("Unknown revision: {0}")]
    UnknownRevision(String),

    /// Remote not found
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// Failed to push
    #[error("Failed to push to remote: {0}")]
    PushFailed(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Changelog file errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Changelog file not found
    #[error("Changelog file not found at {0}")]
    FileNotFound(PathBuf),

    /// Changelog file is not valid UTF-8
    #[error("Changelog file is not valid UTF-8: {0}")]
    InvalidEncoding(PathBuf),

    /// Failed to write changelog
    #[error("Failed to write changelog {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
