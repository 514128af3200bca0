use std::time::Duration;

use thiserror::Error;

/// Application-wide error types for Artemis.
#[derive(Error, Debug)]
pub enum AppError {
    /// Startup configuration is unusable (cache dir, env selector, credentials).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Caller supplied a value that cannot be turned into a search facet.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No job with this identifier is stored.
    #[error("Job {0} not found")]
    NotFound(u64),

    /// HTTP request failed (fetching a page).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request or wait timed out.
    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    /// Interaction with the rendered page failed (missing element, stale node, navigation).
    #[error("Browser error: {0}")]
    BrowserError(String),

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    /// Timeout for a wait of `elapsed`, in whole seconds rounded up.
    pub fn timeout(elapsed: Duration) -> Self {
        AppError::Timeout(elapsed.as_secs_f64().ceil() as u64)
    }

    /// Returns true for site-interaction failures that a later attempt might not hit.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout(_) | AppError::BrowserError(_) => true,
            AppError::HttpError(msg) => {
                msg.contains("timeout") || msg.contains("connect") || msg.contains("reset")
            }
            _ => false,
        }
    }
}
