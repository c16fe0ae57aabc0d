//! Unified error type for the gigagate workspace.

use thiserror::Error;

/// Enumerates all error kinds that can occur across gigagate crates.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The OAuth token exchange was rejected by the authentication endpoint.
    #[error("authentication error: status={status}, {message}")]
    Authentication { status: u16, message: String },

    /// The chat endpoint rejected the request with a non-success status.
    #[error("request error: status={status}, body={body}")]
    Request { status: u16, body: String },

    /// A response payload could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),

    /// HTTP transport failure (connect, send, or body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request or response format translation failure.
    #[error("translation error: {0}")]
    Translation(String),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl GatewayError {
    /// Returns `true` if the error is likely transient and worth retrying.
    ///
    /// Nothing in this workspace retries on its own; the classification is
    /// for callers that layer a retry policy on top.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request { status, .. } | Self::Authentication { status, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            Self::Transport(_) => true,
            _ => false,
        }
    }

    /// The HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } | Self::Authentication { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GatewayError>;
