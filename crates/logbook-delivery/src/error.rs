//! Delivery error types

use thiserror::Error;

/// Result type for delivery operations
pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Errors raised while talking to GitHub or Slack
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Non-success response from an API
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Invalid endpoint or webhook URL
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The changelog has no change-set to announce
    #[error("Nothing to announce for {0}: the changelog has no change-sets")]
    NothingToAnnounce(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeliveryError {
    pub(crate) fn invalid_url(url: &str, err: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}
