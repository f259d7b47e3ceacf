//! Query clauses and the field/term inputs they are built from
//!
//! A clause is the smallest unit of the search controller's criteria
//! language. Clauses render to one of three textual shapes:
//!
//! ```text
//! value[Field]          contains
//! low:high[Field]       range
//! NOTEMPTY([Field])     presence
//! ```

use super::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound used when a range clause omits `from`
pub const RANGE_FLOOR: u32 = 0;

/// Upper bound used when a range clause omits `to`
pub const RANGE_CEILING: u32 = 3000;

/// How a search field accepts input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text, matched with "contains"
    #[default]
    String,
    /// Numeric from/to range (publication years)
    Range,
}

/// A searchable field as offered by the advanced search form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Display name, used verbatim inside the brackets
    pub name: String,

    /// Input kind
    #[serde(default)]
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Create a text field
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::String,
        }
    }

    /// Create a range field
    #[must_use]
    pub fn range(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Range,
        }
    }
}

/// Raw values from the term inputs next to a field selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermInput {
    /// Single text value
    pub text: String,
    /// Range start
    pub from: Option<u32>,
    /// Range end
    pub to: Option<u32>,
}

impl TermInput {
    /// Text-only input
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            text: value.into(),
            ..Self::default()
        }
    }

    /// Range-only input
    #[must_use]
    pub const fn range(from: Option<u32>, to: Option<u32>) -> Self {
        Self {
            text: String::new(),
            from,
            to,
        }
    }

    /// Whether either range bound was supplied
    #[must_use]
    pub const fn has_bounds(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

/// The three match kinds the criteria language supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Contains,
    Range,
    NotEmpty,
}

/// Value carried by a clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseValue {
    Contains(String),
    Range { low: u32, high: u32 },
    NotEmpty,
}

/// A single field/value condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryClause {
    pub field: String,
    pub value: ClauseValue,
}

impl QueryClause {
    /// `value[field]`
    #[must_use]
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: ClauseValue::Contains(value.into()),
        }
    }

    /// `low:high[field]`
    #[must_use]
    pub fn range(field: impl Into<String>, low: u32, high: u32) -> Self {
        Self {
            field: field.into(),
            value: ClauseValue::Range { low, high },
        }
    }

    /// `NOTEMPTY([field])`
    #[must_use]
    pub fn not_empty(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: ClauseValue::NotEmpty,
        }
    }

    /// Build a clause from a field selector and its term inputs
    ///
    /// Range fields always produce a range clause, substituting
    /// [`RANGE_FLOOR`] and [`RANGE_CEILING`] for missing bounds. Bounds are not
    /// checked against each other here.
    ///
    /// Text fields use the trimmed text value. When the text is empty but a
    /// bound was supplied, the bounds are rendered as a range instead.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::MissingField` for a blank field name,
    /// `QueryError::EmptyTerm` when a text field has neither text nor bounds
    /// and `QueryError::InvalidClause` when the field or text contains a
    /// parenthesis.
    pub fn from_input(field: &FieldSpec, term: &TermInput) -> Result<Self, QueryError> {
        let name = field.name.trim();
        if name.is_empty() {
            return Err(QueryError::MissingField);
        }
        reject_grouping(name)?;

        let bounds = || {
            Self::range(
                name,
                term.from.unwrap_or(RANGE_FLOOR),
                term.to.unwrap_or(RANGE_CEILING),
            )
        };

        match field.kind {
            FieldKind::Range => Ok(bounds()),
            FieldKind::String => {
                let text = term.text.trim();
                if !text.is_empty() {
                    reject_grouping(text)?;
                    Ok(Self::contains(name, text))
                } else if term.has_bounds() {
                    Ok(bounds())
                } else {
                    Err(QueryError::EmptyTerm(name.to_string()))
                }
            }
        }
    }

    /// Match kind of this clause
    #[must_use]
    pub const fn match_kind(&self) -> MatchKind {
        match self.value {
            ClauseValue::Contains(_) => MatchKind::Contains,
            ClauseValue::Range { .. } => MatchKind::Range,
            ClauseValue::NotEmpty => MatchKind::NotEmpty,
        }
    }
}

/// Parentheses are reserved for the grouping added on append
fn reject_grouping(input: &str) -> Result<(), QueryError> {
    if input.contains(['(', ')']) {
        return Err(QueryError::InvalidClause(
            input.to_string(),
            "parentheses are not allowed".to_string(),
        ));
    }
    Ok(())
}

impl fmt::Display for QueryClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            ClauseValue::Contains(value) => write!(f, "{value}[{}]", self.field),
            ClauseValue::Range { low, high } => write!(f, "{low}:{high}[{}]", self.field),
            ClauseValue::NotEmpty => write!(f, "NOTEMPTY([{}])", self.field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_rendering() {
        let clause = QueryClause::contains("Title", "microgravity");
        assert_eq!(clause.to_string(), "microgravity[Title]");
        assert_eq!(clause.match_kind(), MatchKind::Contains);
    }

    #[test]
    fn test_not_empty_rendering() {
        let clause = QueryClause::not_empty("Abstract");
        assert_eq!(clause.to_string(), "NOTEMPTY([Abstract])");
        assert_eq!(clause.match_kind(), MatchKind::NotEmpty);
    }

    #[test]
    fn test_range_defaults_when_bounds_missing() {
        let clause =
            QueryClause::from_input(&FieldSpec::range("Pub Year"), &TermInput::default()).unwrap();
        assert_eq!(clause.to_string(), "0:3000[Pub Year]");
    }

    #[test]
    fn test_range_keeps_inverted_bounds() {
        let clause = QueryClause::from_input(
            &FieldSpec::range("Pub Year"),
            &TermInput::range(Some(2020), Some(1990)),
        )
        .unwrap();
        assert_eq!(clause.to_string(), "2020:1990[Pub Year]");
    }

    #[test]
    fn test_text_field_trims_value() {
        let clause =
            QueryClause::from_input(&FieldSpec::text("Author"), &TermInput::text("  Smith ")).unwrap();
        assert_eq!(clause.to_string(), "Smith[Author]");
    }

    #[test]
    fn test_text_field_empty_is_error() {
        let err = QueryClause::from_input(&FieldSpec::text("Author"), &TermInput::text("   "))
            .unwrap_err();
        assert_eq!(err, QueryError::EmptyTerm("Author".into()));
    }

    #[test]
    fn test_text_field_falls_back_to_bounds() {
        let clause = QueryClause::from_input(
            &FieldSpec::text("Volume"),
            &TermInput::range(Some(12), None),
        )
        .unwrap();
        assert_eq!(clause.to_string(), "12:3000[Volume]");
    }

    #[test]
    fn test_blank_field_is_error() {
        let err =
            QueryClause::from_input(&FieldSpec::text("  "), &TermInput::text("x")).unwrap_err();
        assert_eq!(err, QueryError::MissingField);
    }

    #[test]
    fn test_parentheses_are_rejected() {
        let err = QueryClause::from_input(&FieldSpec::text("Title"), &TermInput::text("bone (loss"))
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidClause("bone (loss".into(), "parentheses are not allowed".into())
        );

        let err = QueryClause::from_input(&FieldSpec::text("Title)"), &TermInput::text("bone"))
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidClause(..)));
    }

    #[test]
    fn test_field_kind_deserializes_lowercase() {
        let field: FieldSpec = toml::from_str("name = \"Pub Year\"\nkind = \"range\"").unwrap();
        assert_eq!(field, FieldSpec::range("Pub Year"));

        let field: FieldSpec = toml::from_str("name = \"Title\"").unwrap();
        assert_eq!(field.kind, FieldKind::String);
    }
}
