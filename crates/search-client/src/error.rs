//! Error types for the search client

use std::fmt;

/// Errors that can occur while querying the search service
#[derive(Debug)]
pub enum SearchClientError {
    /// The request did not complete within the configured timeout
    Timeout(String),

    /// Connection refused, reset or otherwise failed in transport
    Transport(String),

    /// The service answered with a non-success status
    Status { status: u16, body: String },

    /// The response body could not be decoded
    Decode(String),

    /// Configuration error
    ConfigError(String),
}

impl fmt::Display for SearchClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(msg) => write!(f, "Search request timed out: {msg}"),
            Self::Transport(msg) => write!(f, "Search request failed: {msg}"),
            Self::Status { status, body } => {
                write!(f, "Search service returned error {status}: {body}")
            }
            Self::Decode(msg) => write!(f, "Malformed search response: {msg}"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for SearchClientError {}

impl From<SearchClientError> for searchbench_core::error::Error {
    fn from(err: SearchClientError) -> Self {
        use searchbench_core::error::Error;
        match err {
            SearchClientError::Timeout(_)
            | SearchClientError::Transport(_)
            | SearchClientError::Status { .. } => Error::connectivity(err.to_string()),
            SearchClientError::Decode(_) => Error::metric_computation(err.to_string()),
            SearchClientError::ConfigError(msg) => Error::config(msg),
        }
    }
}

impl From<reqwest::Error> for SearchClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            let kind = if e.is_connect() {
                "connection"
            } else if e.is_request() {
                "request"
            } else if e.is_body() {
                "body"
            } else {
                "unknown"
            };
            Self::Transport(format!("{kind}: {e}"))
        }
    }
}
