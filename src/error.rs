//! Error types shared across the harness.
//!
//! The poller exposes a single failure kind to callers: [`Error::Timeout`].
//! Driver lookup/interaction failures that occur inside a wait condition are
//! normalized into that same kind, so page objects handle one failure surface
//! instead of N driver-specific ones. Configuration problems are a distinct
//! kind, raised eagerly at setup time and never retried.

use std::time::Duration;

use thiserror::Error;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during harness operations
#[derive(Debug, Error)]
pub enum Error {
    /// A wait condition was not satisfied within its timeout budget
    #[error("condition not met within {timeout:?}: {message}")]
    Timeout {
        /// Descriptive message for the failed condition
        message: String,
        /// The timeout budget that was exhausted
        timeout: Duration,
    },

    /// Invalid configuration detected at setup time
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Error from the WebDriver binding
    #[error("webdriver error: {0}")]
    Driver(#[from] thirtyfour_sync::error::WebDriverError),

    /// Error from the HTTP client
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a timeout error, falling back to a generated message.
    pub fn timeout(message: Option<String>, timeout: Duration) -> Self {
        Error::Timeout {
            message: message
                .unwrap_or_else(|| format!("condition not satisfied after {:?}", timeout)),
            timeout,
        }
    }

    /// Whether this error is the poller's timeout kind.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
