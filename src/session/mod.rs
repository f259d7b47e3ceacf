//! Search session
//!
//! A [`SearchSession`] holds the state of one search page view: the free-text
//! box, the structured criteria, default filters, display options, the current
//! result page and the export selection. Front ends feed it
//! [`SessionAction`]s and render the returned [`SessionOutcome`]s.
//!
//! ```no_run
//! use nslsl::client::HttpBackend;
//! use nslsl::config::NslslConfig;
//! use nslsl::session::{DisplayOptions, SearchSession, SessionAction};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NslslConfig::default();
//! let backend = HttpBackend::new((&config).into())?;
//! let mut session = SearchSession::new(backend, DisplayOptions::default());
//!
//! session.dispatch(SessionAction::SetSearchText("bone loss".into()))?;
//! let outcome = session.dispatch(SessionAction::Search)?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod controller;
pub mod error;
pub mod request;

pub use actions::{ActionKind, ExportSpec, SessionAction, SessionOutcome};
pub use controller::{ActiveSearch, SearchSession};
pub use error::{ErrorSurface, Result, SessionError};
pub use request::{DisplayOptions, PageFormat, PageSize, SearchRequest, VALID_PAGE_SIZES};
