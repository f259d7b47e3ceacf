//! Default filter data structures
//!
//! - `FilterKind`: How a filter option renders
//! - `FilterOption`: One checkbox of the default filter panel
//! - `YearRange`: The custom publication-year range inputs

use serde::{Deserialize, Serialize};

/// How a filter option renders into criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FilterKind {
    /// Published within the last N years; the value is N
    #[serde(rename = "year-within-last-n")]
    YearWithinLastN,

    /// The field named by the value has content
    #[serde(rename = "not-empty")]
    NotEmpty,

    /// The field contains the value
    #[default]
    #[serde(rename = "contains")]
    Contains,
}

/// A default filter option
///
/// Options are stored in the configuration file and selected by name:
///
/// ```toml
/// [[filters]]
/// name = "last-5-years"
/// description = "Published in the last 5 years"
/// kind = "year-within-last-n"
/// value = "5"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Unique name used to select the option
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Field the value is matched against (used by `contains`)
    #[serde(default)]
    pub field: String,

    /// Match kind
    #[serde(default)]
    pub kind: FilterKind,

    /// Filter value
    pub value: String,
}

impl FilterOption {
    /// Create a new filter option
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: FilterKind,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            field: field.into(),
            kind,
            value: value.into(),
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Custom publication-year range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// Whether the range checkbox is ticked
    #[serde(default)]
    pub enabled: bool,

    /// First year
    #[serde(default)]
    pub from: Option<u32>,

    /// Last year
    #[serde(default)]
    pub to: Option<u32>,
}

impl YearRange {
    /// An enabled range with the given bounds
    #[must_use]
    pub const fn new(from: Option<u32>, to: Option<u32>) -> Self {
        Self {
            enabled: true,
            from,
            to,
        }
    }

    /// Whether the range applies to a search
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.enabled
    }
}
