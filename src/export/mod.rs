//! Result export module
//!
//! Results can be emailed or downloaded in one of four formats, for the
//! current page, the ticked results, or everything matching the query.
//! Requests are validated here before any network call.

pub mod error;
pub mod payload;
pub mod types;
pub mod validator;

pub use error::ExportError;
pub use payload::DownloadedFile;
pub use types::{ExportFormat, ExportKind, ExportRequest, SelectionMode};
pub use validator::{
    EMAIL_RESULT_CEILING, SAVE_RESULT_CEILING, is_valid_email, result_ceiling, validate,
};
