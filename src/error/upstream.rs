// src/error/upstream.rs
//
// Failures reported by feed collaborators.
//
// The core never produces these itself; it only needs to treat them the
// same way: abort the current refresh iteration, persist nothing.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Upstream service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),

    #[error("Failed to fetch data from upstream service: {0}")]
    Generic(String),
}

impl UpstreamError {
    /// Stable code used by consumers that render errors.
    pub fn code(&self) -> &'static str {
        match self {
            UpstreamError::Timeout(_) => "UPSTREAM_TIMEOUT",
            UpstreamError::Status { status: 403, .. } => "UPSTREAM_403",
            UpstreamError::Status { status: 404, .. } => "UPSTREAM_404",
            UpstreamError::Status {
                status: 500 | 502 | 503 | 504,
                ..
            } => "UPSTREAM_500",
            UpstreamError::Status { .. } | UpstreamError::Decode(_) | UpstreamError::Generic(_) => {
                "UPSTREAM_ERROR"
            }
        }
    }

    /// Classify a transport failure that carries no status code.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        if lowered.contains("timeout") || lowered.contains("timed out") || lowered.contains("deadline exceeded") {
            UpstreamError::Timeout(message)
        } else {
            UpstreamError::Generic(message)
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::from_message(err.to_string())
        }
    }
}
