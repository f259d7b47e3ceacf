//! Error types for query criteria construction

use thiserror::Error;

/// Errors raised while building query criteria
///
/// These are user-input validation errors: they are reported next to the
/// offending control and never reach the network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Text field submitted without a value or range bounds
    #[error("Enter a search term for '{0}'")]
    EmptyTerm(String),

    /// Field name was blank
    #[error("A search field must be selected")]
    MissingField,

    /// Operator text could not be parsed
    #[error("Unknown operator '{0}' (expected AND, OR or AND NOT)")]
    UnknownOperator(String),

    /// Field or term would unbalance the criteria's grouping
    #[error("Invalid clause '{0}': {1}")]
    InvalidClause(String, String),
}
