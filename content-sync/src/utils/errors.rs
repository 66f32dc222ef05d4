//! Custom error types for content sync.

use thiserror::Error;

use crate::restore::RestoreError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Restore(#[from] RestoreError),
}

impl SyncError {
    /// True for errors caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SyncError::MalformedInput(_))
    }
}

/// A non-success outcome of a single call to the git hosting API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
