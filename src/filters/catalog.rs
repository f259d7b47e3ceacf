//! Catalog of selectable default filter options

use super::composer::PUB_YEAR_FIELD;
use super::error::FilterError;
use super::types::{FilterKind, FilterOption};
use serde::{Deserialize, Serialize};

/// The default filter options offered next to the search box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCatalog {
    options: Vec<FilterOption>,
}

impl FilterCatalog {
    /// Create a catalog from options
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if a name is invalid or used twice.
    pub fn new(options: Vec<FilterOption>) -> Result<Self, FilterError> {
        let catalog = Self { options };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check names are valid and unique
    ///
    /// # Errors
    ///
    /// Returns the first invalid or duplicate name.
    pub fn validate(&self) -> Result<(), FilterError> {
        for (i, option) in self.options.iter().enumerate() {
            validate_filter_name(&option.name)
                .map_err(|reason| FilterError::InvalidName(option.name.clone(), reason))?;
            if self.options[..i].iter().any(|o| o.name == option.name) {
                return Err(FilterError::AlreadyExists(option.name.clone()));
            }
        }
        Ok(())
    }

    /// Get an option by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FilterOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Resolve names to options, keeping the order given
    ///
    /// # Errors
    ///
    /// Returns `FilterError::NotFound` for the first unknown name.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<FilterOption>, FilterError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .cloned()
                    .ok_or_else(|| FilterError::NotFound(name.to_string()))
            })
            .collect()
    }

    /// All options
    #[must_use]
    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }

    /// Number of options
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the catalog has no options
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self {
            options: vec![
                FilterOption::new("last-5-years", FilterKind::YearWithinLastN, PUB_YEAR_FIELD, "5")
                    .with_description("Published in the last 5 years"),
                FilterOption::new("last-10-years", FilterKind::YearWithinLastN, PUB_YEAR_FIELD, "10")
                    .with_description("Published in the last 10 years"),
                FilterOption::new("has-abstract", FilterKind::NotEmpty, "", "Abstract")
                    .with_description("Has an abstract"),
                FilterOption::new("has-doi", FilterKind::NotEmpty, "", "DOI")
                    .with_description("Has a DOI"),
            ],
        }
    }
}

/// Validate a filter name
///
/// Names must be 1-64 characters of alphanumerics, `-` or `_`.
///
/// # Errors
///
/// Returns a description of the problem.
pub fn validate_filter_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Filter name cannot be empty".to_string());
    }

    if name.len() > 64 {
        return Err(format!(
            "Filter name too long (max 64 chars): {}",
            name.len()
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(format!(
            "Filter name '{name}' contains invalid characters (only alphanumeric, '-', and '_' allowed)"
        ));
    }

    Ok(())
}
