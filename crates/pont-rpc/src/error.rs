//! Error types for the bridge.

use thiserror::Error;

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, PontError>;

/// Error type for bridge operations.
///
/// Every variant that arises while handling an identified request is
/// converted into a `-32603` error envelope by the pipeline; nothing here
/// ever terminates the process.
#[derive(Debug, Error)]
pub enum PontError {
    /// Failed to deliver the request to or read the response from the
    /// remote endpoint (connection error, timeout, bad status, empty or
    /// undecodable body).
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PontError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
