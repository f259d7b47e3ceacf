//! Error types for default filter composition
//!
//! Every variant is a user-input validation error: the composer refuses to
//! produce criteria and the search is not sent.

use thiserror::Error;

/// Errors that can occur while composing default filter criteria
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Custom range bound is not a four digit year
    #[error("Year '{0}' must have exactly four digits")]
    InvalidYear(u32),

    /// Custom range start is after its end
    #[error("Start year {from} is after end year {to}")]
    InvertedRange { from: u32, to: u32 },

    /// Filter value cannot be interpreted for its kind
    #[error("Invalid value '{value}' for filter '{name}'")]
    InvalidValue { name: String, value: String },

    /// Filter not present in the catalog
    #[error("Filter '{0}' not found")]
    NotFound(String),

    /// Filter defined twice in the catalog
    #[error("Filter '{0}' already exists")]
    AlreadyExists(String),

    /// Invalid filter name
    #[error("Invalid filter name '{0}': {1}")]
    InvalidName(String, String),
}
