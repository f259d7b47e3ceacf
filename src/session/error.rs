//! Session error types and where they are shown

use super::actions::ActionKind;
use crate::client::ClientError;
use crate::export::ExportError;
use crate::filters::FilterError;
use crate::query::QueryError;
use thiserror::Error;

/// Session result type
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors returned by [`SearchSession::dispatch`](super::SearchSession::dispatch)
///
/// None of them end the session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Neither search text nor structured criteria
    #[error("Enter a search term or build a query first")]
    EmptyQuery,

    /// Invalid clause input
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Invalid default filter input
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Export rejected or failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Transport or server failure
    #[error("Search service error: {0}")]
    Network(#[from] ClientError),

    /// The same action is still waiting for its response
    #[error("{0} is already in progress")]
    Busy(ActionKind),

    /// Action needs results from a previous search
    #[error("Run a search first")]
    NoActiveSearch,

    /// Page outside the result set
    #[error("Page {page} is out of range (1-{pages})")]
    InvalidPage { page: u32, pages: u32 },
}

/// Where an error is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSurface {
    /// Next to the control that caused it
    Inline,
    /// Generic failure notice
    Toast,
    /// Dedicated notice for exports over the result limit
    OversizedToast,
}

impl SessionError {
    /// Where this error should be shown
    #[must_use]
    pub fn surface(&self) -> ErrorSurface {
        match self {
            Self::Export(e) if e.is_oversized() => ErrorSurface::OversizedToast,
            Self::Export(e) if e.is_validation() => ErrorSurface::Inline,
            Self::Export(_) | Self::Network(_) => ErrorSurface::Toast,
            Self::EmptyQuery
            | Self::Query(_)
            | Self::Filter(_)
            | Self::Busy(_)
            | Self::NoActiveSearch
            | Self::InvalidPage { .. } => ErrorSurface::Inline,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
