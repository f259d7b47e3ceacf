//! Incremental construction of the criteria string
//!
//! The advanced search form adds one clause at a time to a criteria string
//! the user can also edit by hand. Appending works on that string directly:
//!
//! ```text
//! ""                       + x[A]          -> x[A]
//! "x[A]"                   + OR  y[B]      -> (x[A]) OR (y[B])
//! "(x[A]) OR (y[B])"       + AND z[C]      -> ((x[A]) OR (y[B])) AND (z[C])
//! ```
//!
//! The first clause takes no operator. Callers use
//! [`AppendOutcome::first_append`] to decide when to offer the operator
//! choices.

use super::clause::{FieldSpec, QueryClause, TermInput};
use super::error::QueryError;
use super::expression::Operator;

/// Result of appending a clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Updated criteria string
    pub criteria: String,
    /// True when the criteria were empty before this append
    pub first_append: bool,
}

/// Append a clause built from field/term inputs to `current`
///
/// # Errors
///
/// Returns `QueryError` when the inputs do not form a clause (see
/// [`QueryClause::from_input`]). `current` is left untouched by the caller in
/// that case.
pub fn append(
    current: &str,
    field: &FieldSpec,
    term: &TermInput,
    operator: Operator,
) -> Result<AppendOutcome, QueryError> {
    let clause = QueryClause::from_input(field, term)?;
    Ok(append_clause(current, &clause, operator))
}

/// Append an already-built clause to `current`
///
/// A blank `current` counts as empty. Otherwise it is wrapped exactly as
/// given.
#[must_use]
pub fn append_clause(current: &str, clause: &QueryClause, operator: Operator) -> AppendOutcome {
    if current.trim().is_empty() {
        AppendOutcome {
            criteria: clause.to_string(),
            first_append: true,
        }
    } else {
        AppendOutcome {
            criteria: format!("({current}) {operator} ({clause})"),
            first_append: false,
        }
    }
}

/// Criteria string plus the operator-visibility flag of the search form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCriteriaBuilder {
    criteria: String,
    operators_visible: bool,
}

impl QueryCriteriaBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from hand-edited criteria
    #[must_use]
    pub fn from_criteria(criteria: impl Into<String>) -> Self {
        let criteria = criteria.into().trim().to_string();
        let operators_visible = !criteria.is_empty();
        Self {
            criteria,
            operators_visible,
        }
    }

    /// Append a clause from field/term inputs
    ///
    /// # Errors
    ///
    /// Returns `QueryError` when the inputs are invalid; the builder is unchanged.
    pub fn push(
        &mut self,
        field: &FieldSpec,
        term: &TermInput,
        operator: Operator,
    ) -> Result<AppendOutcome, QueryError> {
        let clause = QueryClause::from_input(field, term)?;
        Ok(self.push_clause(&clause, operator))
    }

    /// Append an already-built clause
    pub fn push_clause(&mut self, clause: &QueryClause, operator: Operator) -> AppendOutcome {
        let outcome = append_clause(&self.criteria, clause, operator);
        self.criteria.clone_from(&outcome.criteria);
        self.operators_visible = true;
        outcome
    }

    /// Current criteria string
    #[must_use]
    pub fn criteria(&self) -> &str {
        &self.criteria
    }

    /// Whether no clause has been added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Whether the AND / OR / AND NOT choices should be shown
    #[must_use]
    pub const fn operators_visible(&self) -> bool {
        self.operators_visible
    }

    /// Reset to an empty criteria string and hide the operators again
    pub fn clear(&mut self) {
        self.criteria.clear();
        self.operators_visible = false;
    }
}
