//! Error types for the store, webhook, and configuration layers.

use thiserror::Error;

/// Errors that can occur while fetching a telemetry snapshot.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection to the store failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for the store.
    #[error("Request timed out")]
    Timeout,

    /// Reading a local snapshot failed.
    #[error("Read error: {0}")]
    Read(String),

    /// The response was not a snapshot.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The producing side of a channel source is gone.
    #[error("Source closed")]
    Closed,
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_connect() {
            SourceError::Connection(err.to_string())
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err.to_string())
    }
}

/// Errors from a single notification attempt.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The webhook could not be reached.
    #[error("Webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The webhook answered with a non-success status.
    #[error("Webhook returned status {0}")]
    Status(u16),

    /// The notifier was built without a target URL.
    #[error("Webhook URL is not set")]
    MissingUrl,
}

/// Invalid startup configuration. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("window_size must be at least 1")]
    InvalidWindowSize,

    #[error("poll_interval_seconds must be a positive number, got {0}")]
    InvalidPollInterval(f64),

    #[error("store.timeout_seconds must be a positive number, got {0}")]
    InvalidTimeout(f64),

    #[error("no store configured: set store.url or store.file")]
    MissingStore,

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
