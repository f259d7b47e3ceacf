//! Query criteria module
//!
//! Builds the structured criteria strings accepted by the search controller's
//! advanced search. Clauses are rendered as `value[Field]`, `from:to[Field]`
//! or `NOTEMPTY([Field])` and joined with `AND`, `OR` or `AND NOT`, wrapping
//! both sides in parentheses on every append after the first.
//!
//! # Examples
//!
//! ```
//! use nslsl::query::{FieldSpec, Operator, QueryCriteriaBuilder, TermInput};
//!
//! let mut builder = QueryCriteriaBuilder::new();
//! builder.push(&FieldSpec::text("Title"), &TermInput::text("bone"), Operator::And).unwrap();
//! builder.push(&FieldSpec::range("Pub Year"), &TermInput::range(Some(1990), None), Operator::Or).unwrap();
//!
//! assert_eq!(builder.criteria(), "(bone[Title]) OR (1990:3000[Pub Year])");
//! ```

pub mod builder;
pub mod clause;
pub mod error;
pub mod expression;

pub use builder::{AppendOutcome, QueryCriteriaBuilder, append, append_clause};
pub use clause::{
    ClauseValue, FieldKind, FieldSpec, MatchKind, QueryClause, RANGE_CEILING, RANGE_FLOOR,
    TermInput,
};
pub use error::QueryError;
pub use expression::{Operator, QueryExpression, is_balanced};
