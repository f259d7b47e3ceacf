//! Error types for result export

use super::types::ExportKind;
use std::io;
use thiserror::Error;

/// Errors that can occur while preparing or completing an export
#[derive(Debug, Error)]
pub enum ExportError {
    /// "Selected" mode with nothing selected
    #[error("No results are selected")]
    EmptySelection,

    /// Result count above the ceiling for the export kind
    #[error("{count} results exceed the {kind} limit of {ceiling}")]
    TooManyResults {
        kind: ExportKind,
        count: u64,
        ceiling: u64,
    },

    /// Email export without a recipient
    #[error("An email address is required")]
    MissingEmail,

    /// Malformed recipient address
    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),

    /// The server reported that the email was not sent
    #[error("The server did not send the results email")]
    NotSent,

    /// Download payload could not be decoded
    #[error("Invalid download payload: {0}")]
    InvalidPayload(String),

    /// I/O error while writing a download
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ExportError {
    /// Whether this is the oversized-export case
    #[must_use]
    pub const fn is_oversized(&self) -> bool {
        matches!(self, Self::TooManyResults { .. })
    }

    /// Whether this error is caught before any request is sent
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptySelection | Self::MissingEmail | Self::InvalidEmail(_)
        )
    }
}

impl From<base64::DecodeError> for ExportError {
    fn from(err: base64::DecodeError) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}
