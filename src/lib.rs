//! nslsl - A client for the NASA Space Life Sciences Library search
//!
//! This library models the library's search page: structured query
//! construction, default filters, a selection that survives pagination,
//! export validation, and the transport to the site's search controller.

use thiserror::Error;

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod export;
pub mod filters;
pub mod output;
pub mod query;
pub mod selection;
pub mod session;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum NslslError {
    /// Search session error
    #[error(transparent)]
    Session(#[from] session::SessionError),
    /// Transport error outside a session
    #[error("Search service error: {0}")]
    Client(#[from] client::ClientError),
    /// Query construction error
    #[error("Query error: {0}")]
    Query(#[from] query::QueryError),
    /// Default filter error
    #[error("Filter error: {0}")]
    Filter(#[from] filters::FilterError),
    /// Export error outside a session
    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
