//! Request model shared by every search controller endpoint
//!
//! The controller binds a form-encoded `model` object:
//!
//! ```text
//! model.PageFormat              Summary
//! model.CurrentPage             1
//! model.SortBy                  PubDate
//! model.SortAscending           true
//! model.SearchCriteria          (bone[Title]) AND (1990:2000[Pub Year])
//! model.NumberPerPage           20
//! model.DefaultFilterCriteria   NOTEMPTY ([Abstract])
//! model.SelectAllChecked        false
//! model.ExportOptions.Type      Email
//! model.ExportOptions.SelectedIds[0]  12345
//! ```

use crate::export::ExportRequest;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page sizes the result list accepts
pub const VALID_PAGE_SIZES: [u32; 7] = [10, 20, 50, 100, 200, 500, 1000];

/// Number of results per page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Largest page size
    pub const MAX: Self = Self(1000);

    /// Results per page
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(20)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if VALID_PAGE_SIZES.contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "page size {value} is not one of {}",
                VALID_PAGE_SIZES.map(|s| s.to_string()).join(", ")
            ))
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Layout of the rendered result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum PageFormat {
    #[default]
    Summary,
    Abstract,
    AllFields,
}

impl PageFormat {
    /// Value of `model.PageFormat`
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::Abstract => "Abstract",
            Self::AllFields => "AllFields",
        }
    }
}

/// Sort and layout settings of the result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(default)]
    pub page_format: PageFormat,
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_ascending")]
    pub sort_ascending: bool,
}

fn default_sort_by() -> String {
    "PubDate".to_string()
}

const fn default_sort_ascending() -> bool {
    true
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            page_format: PageFormat::default(),
            page_size: PageSize::default(),
            sort_by: default_sort_by(),
            sort_ascending: default_sort_ascending(),
        }
    }
}

/// Complete request model for one call to the search controller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchRequest {
    pub display: DisplayOptions,
    /// One-based page index
    pub current_page: u32,
    pub search_criteria: String,
    pub default_filter_criteria: String,
    pub select_all_checked: bool,
    pub export: Option<ExportRequest>,
}

impl SearchRequest {
    /// Request for the first page of `criteria`
    #[must_use]
    pub fn new(criteria: impl Into<String>, display: DisplayOptions) -> Self {
        Self {
            display,
            current_page: 1,
            search_criteria: criteria.into(),
            ..Self::default()
        }
    }

    /// Same request for another page
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.current_page = page.max(1);
        self
    }

    /// Form fields as the controller's model binder expects them
    #[must_use]
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![
            field("PageFormat", self.display.page_format.wire_name()),
            field("CurrentPage", self.current_page.max(1)),
            field("SortBy", &self.display.sort_by),
            field("SortAscending", self.display.sort_ascending),
            field("SearchCriteria", &self.search_criteria),
            field("NumberPerPage", self.display.page_size),
            field("DefaultFilterCriteria", &self.default_filter_criteria),
            field("SelectAllChecked", self.select_all_checked),
        ];

        if let Some(export) = &self.export {
            form.push(field("ExportOptions.Type", export.kind.wire_name()));
            form.push(field(
                "ExportOptions.SelectionMode",
                export.selection_mode.wire_name(),
            ));
            form.push(field("ExportOptions.Format", export.format.wire_name()));
            if let Some(email) = &export.recipient_email {
                form.push(field("ExportOptions.EmailAddress", email));
            }
            for (i, id) in export.selected_ids.iter().enumerate() {
                form.push(field(&format!("ExportOptions.SelectedIds[{i}]"), id));
            }
        }

        form
    }
}

fn field(name: &str, value: impl ToString) -> (String, String) {
    (format!("model.{name}"), value.to_string())
}
