//! Error types for hotentry-rss.

use thiserror::Error;

/// Common error type for hotentry-rss.
#[derive(Error, Debug)]
pub enum HotentryError {
    /// Connection failure or timeout while talking to the upstream site.
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status.
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Malformed JSON/XML, or a required element was missing.
    #[error("parse error: {0}")]
    Parse(String),

    /// Feed document could not be written.
    #[error("render error: {0}")]
    Render(String),

    /// Both the primary endpoint and the fallback feed failed.
    #[error("primary source failed ({primary}); fallback failed ({fallback})")]
    Fallback {
        primary: Box<HotentryError>,
        fallback: Box<HotentryError>,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HotentryError {
    /// Combine the failures of both fetch attempts.
    pub fn fallback(primary: HotentryError, fallback: HotentryError) -> Self {
        HotentryError::Fallback {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }
    }
}

impl From<reqwest::Error> for HotentryError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            HotentryError::HttpStatus(status.as_u16())
        } else if e.is_decode() {
            HotentryError::Parse(e.to_string())
        } else {
            HotentryError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for HotentryError {
    fn from(e: serde_json::Error) -> Self {
        HotentryError::Parse(format!("invalid JSON: {e}"))
    }
}

/// Result type alias for hotentry-rss operations.
pub type Result<T> = std::result::Result<T, HotentryError>;
