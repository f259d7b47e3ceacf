//! Transport error types
//!
//! Every variant is a network/server failure and is surfaced to the user as
//! a generic notice; the session stays usable.

use thiserror::Error;

/// Errors that can occur while talking to the search controller
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    /// The search page did not contain an anti-forgery token
    #[error("Anti-forgery token not found on the search page")]
    MissingToken,

    /// Site or redirect address could not be parsed or resolved
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// Response body did not have the expected shape
    #[error("Unexpected response from {endpoint}: {reason}")]
    UnexpectedResponse { endpoint: String, reason: String },
}

impl ClientError {
    pub(crate) fn unexpected(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}
