//! Export request data structures

use crate::selection::ItemId;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where exported results go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ExportKind {
    /// Mailed by the server
    Email,
    /// Downloaded as a file
    Save,
}

impl ExportKind {
    /// Value of `model.ExportOptions.Type`
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Save => "Save",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Save => f.write_str("save"),
        }
    }
}

/// Which results are exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum SelectionMode {
    /// Every result on the current page
    #[value(name = "page")]
    AllOnPage,
    /// Only ticked results
    Selected,
    /// Every result matching the query
    All,
}

impl SelectionMode {
    /// Value of `model.ExportOptions.SelectionMode`
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::AllOnPage => "AllOnPage",
            Self::Selected => "Selected",
            Self::All => "All",
        }
    }
}

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Abstract,
    Summary,
    AllFields,
}

impl ExportFormat {
    /// Value of `model.ExportOptions.Format`
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Abstract => "Abstract",
            Self::Summary => "Summary",
            Self::AllFields => "AllFields",
        }
    }

    /// Name of the downloaded file
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Csv => "NSLSL-Results-CSV.csv",
            Self::Abstract => "NSLSL-Results-Abstract.txt",
            Self::Summary => "NSLSL-Results-Summary.txt",
            Self::AllFields => "NSLSL-Results-AllFields.xlsx",
        }
    }
}

/// A validated export, ready to be attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub kind: ExportKind,
    pub selection_mode: SelectionMode,
    pub format: ExportFormat,
    pub recipient_email: Option<String>,
    pub selected_ids: Vec<ItemId>,
}
