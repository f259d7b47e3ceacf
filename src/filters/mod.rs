//! Default filter module
//!
//! The default filter panel narrows every search with a second criteria
//! string (`model.DefaultFilterCriteria`) built from ticked options and an
//! optional custom publication-year range.
//!
//! # Examples
//!
//! ```
//! use nslsl::filters::{FilterCatalog, YearRange, compose};
//!
//! let catalog = FilterCatalog::default();
//! let selected = catalog.select(&["has-abstract"]).unwrap();
//! let range = YearRange::new(Some(1990), Some(2000));
//!
//! let criteria = compose(&selected, Some(&range), 2026).unwrap();
//! assert_eq!(criteria, "NOTEMPTY ([Abstract]) BETWEEN (1990:2000[Pub Year])");
//! ```

pub mod catalog;
pub mod composer;
pub mod error;
pub mod types;

pub use catalog::{FilterCatalog, validate_filter_name};
pub use composer::{PUB_YEAR_FIELD, compose, compose_now};
pub use error::FilterError;
pub use types::{FilterKind, FilterOption, YearRange};
