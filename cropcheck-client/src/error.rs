//! Error types for the crop service client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the crop service
#[derive(Debug, Error)]
pub enum ClientError {
    /// Submit request never got an HTTP answer
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service rejected a create-job request
    #[error("submission rejected (status {status}): {body}")]
    Submission {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the service
        body: String,
    },

    /// Status request failed; the job should be polled again later
    #[error("{}", poll_message(*status, message))]
    Poll {
        /// HTTP status code, absent when the request never got an answer
        status: Option<u16>,
        message: String,
    },

    /// Service answered with success but the body breaks the contract
    #[error("protocol error: {0}")]
    Protocol(String),
}

fn poll_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("status poll failed (status {}): {}", status, message),
        None => format!("status poll failed: {}", message),
    }
}

impl ClientError {
    /// Create a submission error from status code and body
    pub fn submission(status: u16, body: impl Into<String>) -> Self {
        Self::Submission {
            status,
            body: body.into(),
        }
    }

    /// Create a poll error for a request that produced no HTTP status
    pub fn poll_transport(err: reqwest::Error) -> Self {
        Self::Poll {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    /// Check if the failed call may succeed when simply repeated
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Poll { .. })
    }

    /// Check if this error is a protocol violation
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// HTTP status attached to the error, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Submission { status, .. } => Some(*status),
            Self::Poll { status, .. } => *status,
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Protocol(_) => None,
        }
    }
}
