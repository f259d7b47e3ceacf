//! Session actions
//!
//! Every user interaction with the search page maps to one `SessionAction`.
//! Front ends translate their input events into actions and hand them to
//! [`SearchSession::dispatch`](super::SearchSession::dispatch).

use super::request::DisplayOptions;
use crate::export::{DownloadedFile, ExportFormat, ExportKind, SelectionMode};
use crate::filters::{FilterOption, YearRange};
use crate::query::{FieldSpec, Operator, TermInput};
use crate::selection::ItemId;
use std::fmt;

/// Actions a user can take on the search page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Type into the simple search box
    SetSearchText(String),
    /// Add a clause from the advanced search field/term inputs
    AppendClause {
        field: FieldSpec,
        term: TermInput,
        operator: Operator,
    },
    /// Replace the criteria with hand-edited text
    SetCriteria(String),
    /// Empty the criteria
    ClearCriteria,
    /// Tick or untick a default filter option
    ToggleFilter(FilterOption),
    /// Change the custom publication-year range
    SetCustomRange(YearRange),
    /// Submit a new search
    Search,
    /// Go to a result page
    FetchPage(u32),
    /// Change sort, page size or layout
    ChangeDisplayOptions(DisplayOptions),
    /// Tick or untick one result
    ToggleItem(ItemId),
    /// Tick or untick "select all"
    SelectAll(bool),
    /// Untick everything
    ClearSelection,
    /// Open the advanced search form
    LoadAdvancedForm,
    /// Email or download results
    Export(ExportSpec),
}

/// Export dialog inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpec {
    pub kind: ExportKind,
    pub mode: SelectionMode,
    pub format: ExportFormat,
    pub recipient: Option<String>,
}

/// Trigger groups; a group cannot be re-triggered while its request runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Search,
    FetchPage,
    ChangeDisplayOptions,
    AdvancedForm,
    SelectAll,
    Email,
    Download,
    /// Handled without a request
    Local,
}

impl ActionKind {
    /// Whether actions of this kind issue a request
    #[must_use]
    pub const fn uses_network(self) -> bool {
        !matches!(self, Self::Local)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Search => "search",
            Self::FetchPage => "page fetch",
            Self::ChangeDisplayOptions => "display change",
            Self::AdvancedForm => "advanced search form",
            Self::SelectAll => "select all",
            Self::Email => "email export",
            Self::Download => "download",
            Self::Local => "local update",
        };
        f.write_str(name)
    }
}

impl SessionAction {
    /// Trigger group of this action
    ///
    /// `SelectAll(false)` and display changes before any search are handled
    /// locally but still share their trigger's group.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Search => ActionKind::Search,
            Self::FetchPage(_) => ActionKind::FetchPage,
            Self::ChangeDisplayOptions(_) => ActionKind::ChangeDisplayOptions,
            Self::LoadAdvancedForm => ActionKind::AdvancedForm,
            Self::SelectAll(_) => ActionKind::SelectAll,
            Self::Export(spec) => match spec.kind {
                ExportKind::Email => ActionKind::Email,
                ExportKind::Save => ActionKind::Download,
            },
            Self::SetSearchText(_)
            | Self::AppendClause { .. }
            | Self::SetCriteria(_)
            | Self::ClearCriteria
            | Self::ToggleFilter(_)
            | Self::SetCustomRange(_)
            | Self::ToggleItem(_)
            | Self::ClearSelection => ActionKind::Local,
        }
    }
}

/// What changed after an action, for the front end to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Search text stored
    SearchTextUpdated,
    /// Criteria changed
    CriteriaUpdated {
        criteria: String,
        show_operators: bool,
    },
    /// Default filter inputs changed
    FiltersUpdated { selected: Vec<String> },
    /// The result list was replaced
    ResultsReplaced {
        page: u32,
        total_results: Option<u64>,
        total_pages: Option<u32>,
        visible: Vec<ItemId>,
        /// Visible results to show as ticked
        checked: Vec<ItemId>,
    },
    /// The server redirected the search
    Redirect { url: String },
    /// Display options stored for the next search
    DisplayUpdated,
    /// Export selection changed
    SelectionChanged { count: usize, label: String },
    /// Advanced search form fragment
    AdvancedForm(String),
    /// Results were emailed
    EmailSent,
    /// Results were downloaded
    Downloaded(DownloadedFile),
}
