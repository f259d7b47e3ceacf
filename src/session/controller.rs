//! Search session controller
//!
//! `SearchSession` owns all state of one search page view and is the single
//! place user actions are handled.
//!
//! # Workflow
//!
//! ```text
//! SetSearchText / AppendClause / ToggleFilter / SetCustomRange
//!     ↓ (local state only)
//! Search ──→ compose default filters ──→ SearchAjax
//!     │         ├─ Redirect → Redirect outcome
//!     │         └─ Results  → store page, reset selection
//!     ↓
//! FetchPage / ChangeDisplayOptions ──→ replace page, reapply ticks
//! ToggleItem / SelectAll           ──→ selection changes
//! Export                           ──→ validate ──→ Email / Download
//! ```
//!
//! A network action marks its trigger group busy for the duration of its
//! request; a second action of the same group fails with
//! [`SessionError::Busy`] while other groups proceed. Busy markers are cleared
//! on every exit path.

use super::actions::{ActionKind, ExportSpec, SessionAction, SessionOutcome};
use super::error::{Result, SessionError};
use super::request::{DisplayOptions, SearchRequest};
use crate::client::{ResultFragment, SearchBackend, SearchResponse};
use crate::export::{self, DownloadedFile, ExportError, ExportKind, SelectionMode};
use crate::filters::{self, FilterOption, YearRange};
use crate::query::QueryCriteriaBuilder;
use crate::selection::{ItemId, SelectionTracker};
use chrono::Datelike;
use std::collections::HashSet;
use tracing::{debug, info};

/// Query sent by the last successful search
///
/// Page fetches and display changes reuse it even if the inputs have been
/// edited since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSearch {
    pub criteria: String,
    pub default_filter_criteria: String,
}

/// State of one search page view
pub struct SearchSession<B: SearchBackend> {
    backend: B,
    search_text: String,
    builder: QueryCriteriaBuilder,
    selected_filters: Vec<FilterOption>,
    custom_range: YearRange,
    display: DisplayOptions,
    current_year: i32,
    active: Option<ActiveSearch>,
    current_page: u32,
    results: Option<ResultFragment>,
    selection: SelectionTracker,
    select_all_checked: bool,
    advanced_form: Option<String>,
    in_flight: HashSet<ActionKind>,
}

impl<B: SearchBackend> SearchSession<B> {
    /// Start a session
    #[must_use]
    pub fn new(backend: B, display: DisplayOptions) -> Self {
        Self {
            backend,
            search_text: String::new(),
            builder: QueryCriteriaBuilder::new(),
            selected_filters: Vec::new(),
            custom_range: YearRange::default(),
            display,
            current_year: chrono::Local::now().year(),
            active: None,
            current_page: 1,
            results: None,
            selection: SelectionTracker::new(),
            select_all_checked: false,
            advanced_form: None,
            in_flight: HashSet::new(),
        }
    }

    /// Anchor "last N years" filters at `year` instead of today
    #[must_use]
    pub const fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Handle one user action
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for invalid input, a busy trigger, or a failed
    /// request. The session stays usable after any error.
    pub fn dispatch(&mut self, action: SessionAction) -> Result<SessionOutcome> {
        let kind = action.kind();
        debug!(%kind, "dispatching action");

        if !kind.uses_network() {
            return self.apply(action);
        }

        self.begin(kind)?;
        let outcome = self.apply(action);
        self.finish(kind);
        outcome
    }

    /// Mark a trigger group busy
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` if the group is already busy.
    pub fn begin(&mut self, kind: ActionKind) -> Result<()> {
        if !self.in_flight.insert(kind) {
            return Err(SessionError::Busy(kind));
        }
        Ok(())
    }

    /// Clear a trigger group's busy marker
    pub fn finish(&mut self, kind: ActionKind) {
        self.in_flight.remove(&kind);
    }

    /// Whether a trigger group is waiting for a response
    #[must_use]
    pub fn is_busy(&self, kind: ActionKind) -> bool {
        self.in_flight.contains(&kind)
    }

    fn apply(&mut self, action: SessionAction) -> Result<SessionOutcome> {
        match action {
            SessionAction::SetSearchText(text) => {
                self.search_text = text.trim().to_string();
                Ok(SessionOutcome::SearchTextUpdated)
            }
            SessionAction::AppendClause {
                field,
                term,
                operator,
            } => {
                let outcome = self.builder.push(&field, &term, operator)?;
                Ok(SessionOutcome::CriteriaUpdated {
                    criteria: outcome.criteria,
                    show_operators: self.builder.operators_visible(),
                })
            }
            SessionAction::SetCriteria(text) => {
                self.builder = QueryCriteriaBuilder::from_criteria(text);
                Ok(self.criteria_outcome())
            }
            SessionAction::ClearCriteria => {
                self.builder.clear();
                Ok(self.criteria_outcome())
            }
            SessionAction::ToggleFilter(option) => {
                if let Some(pos) = self
                    .selected_filters
                    .iter()
                    .position(|o| o.name == option.name)
                {
                    self.selected_filters.remove(pos);
                } else {
                    self.selected_filters.push(option);
                }
                Ok(self.filters_outcome())
            }
            SessionAction::SetCustomRange(range) => {
                self.custom_range = range;
                Ok(self.filters_outcome())
            }
            SessionAction::ToggleItem(id) => {
                self.selection.toggle(id);
                self.select_all_checked = false;
                Ok(self.selection_outcome())
            }
            SessionAction::ClearSelection => {
                self.selection.clear();
                self.select_all_checked = false;
                Ok(self.selection_outcome())
            }
            SessionAction::Search => self.search(),
            SessionAction::FetchPage(page) => self.fetch_page(page),
            SessionAction::ChangeDisplayOptions(display) => self.change_display(display),
            SessionAction::LoadAdvancedForm => self.advanced_form(),
            SessionAction::SelectAll(checked) => self.select_all(checked),
            SessionAction::Export(spec) => self.export(&spec),
        }
    }

    fn search(&mut self) -> Result<SessionOutcome> {
        let criteria = if self.builder.is_empty() {
            self.search_text.clone()
        } else {
            self.builder.criteria().to_string()
        };
        if criteria.is_empty() {
            return Err(SessionError::EmptyQuery);
        }

        let default_filter_criteria = filters::compose(
            &self.selected_filters,
            Some(&self.custom_range),
            self.current_year,
        )?;

        let active = ActiveSearch {
            criteria,
            default_filter_criteria,
        };
        let request = self.request_for(&active, 1);
        info!(criteria = %active.criteria, filters = %active.default_filter_criteria, "searching");

        let response = self.backend.search(&request)?;

        self.selection.clear();
        self.select_all_checked = false;
        self.active = Some(active);

        match response {
            SearchResponse::Redirect { url } => {
                self.results = None;
                Ok(SessionOutcome::Redirect { url })
            }
            SearchResponse::Results(fragment) => Ok(self.replace_results(1, fragment)),
        }
    }

    fn fetch_page(&mut self, page: u32) -> Result<SessionOutcome> {
        let active = self.active.clone().ok_or(SessionError::NoActiveSearch)?;
        let pages = self.total_pages();
        if page == 0 || pages.is_some_and(|p| page > p) {
            return Err(SessionError::InvalidPage {
                page,
                pages: pages.unwrap_or(1),
            });
        }

        let request = self.request_for(&active, page);
        let fragment = self.backend.fetch_page(&request)?;
        Ok(self.replace_results(page, fragment))
    }

    fn change_display(&mut self, display: DisplayOptions) -> Result<SessionOutcome> {
        let Some(active) = self.active.clone() else {
            self.display = display;
            return Ok(SessionOutcome::DisplayUpdated);
        };

        let previous = std::mem::replace(&mut self.display, display);
        let request = self.request_for(&active, 1);
        match self.backend.change_display_options(&request) {
            Ok(fragment) => Ok(self.replace_results(1, fragment)),
            Err(e) => {
                self.display = previous;
                Err(e.into())
            }
        }
    }

    fn advanced_form(&mut self) -> Result<SessionOutcome> {
        if let Some(form) = &self.advanced_form {
            return Ok(SessionOutcome::AdvancedForm(form.clone()));
        }
        let form = self.backend.advanced_search_form()?;
        self.advanced_form = Some(form.clone());
        Ok(SessionOutcome::AdvancedForm(form))
    }

    fn select_all(&mut self, checked: bool) -> Result<SessionOutcome> {
        if checked {
            let active = self.active.clone().ok_or(SessionError::NoActiveSearch)?;
            let mut request = self.request_for(&active, self.current_page);
            request.select_all_checked = true;
            let ids = self.backend.select_all_ids(&request)?;
            self.selection.set_all(ids);
        } else {
            self.selection.set_all(Vec::new());
        }
        self.select_all_checked = checked;
        Ok(self.selection_outcome())
    }

    fn export(&mut self, spec: &ExportSpec) -> Result<SessionOutcome> {
        let active = self.active.clone().ok_or(SessionError::NoActiveSearch)?;

        let visible = self.visible_ids();
        let ids = match spec.mode {
            SelectionMode::Selected => self.selection.ids(),
            SelectionMode::AllOnPage => visible.clone(),
            SelectionMode::All => Vec::new(),
        };
        let reported_total = self
            .results
            .as_ref()
            .and_then(|r| r.total_results)
            .unwrap_or(visible.len() as u64);

        let export = export::validate(
            spec.mode,
            spec.format,
            &ids,
            reported_total,
            spec.kind,
            spec.recipient.as_deref(),
        )?;

        let mut request = self.request_for(&active, self.current_page);
        request.export = Some(export);

        match spec.kind {
            ExportKind::Email => {
                if self.backend.email_results(&request)? {
                    info!(format = ?spec.format, "results emailed");
                    Ok(SessionOutcome::EmailSent)
                } else {
                    Err(ExportError::NotSent.into())
                }
            }
            ExportKind::Save => {
                let payload = self.backend.download_results(&request)?;
                let file = DownloadedFile::decode(spec.format, &payload)?;
                info!(file = %file.file_name, bytes = file.bytes.len(), "results downloaded");
                Ok(SessionOutcome::Downloaded(file))
            }
        }
    }

    fn request_for(&self, active: &ActiveSearch, page: u32) -> SearchRequest {
        SearchRequest {
            display: self.display.clone(),
            current_page: page,
            search_criteria: active.criteria.clone(),
            default_filter_criteria: active.default_filter_criteria.clone(),
            select_all_checked: self.select_all_checked,
            export: None,
        }
    }

    fn replace_results(&mut self, page: u32, fragment: ResultFragment) -> SessionOutcome {
        let visible = fragment.item_ids();
        let checked = self.selection.reapply(&visible);
        let outcome = SessionOutcome::ResultsReplaced {
            page,
            total_results: fragment.total_results,
            total_pages: fragment.total_pages,
            visible,
            checked,
        };
        self.current_page = page;
        self.results = Some(fragment);
        outcome
    }

    fn criteria_outcome(&self) -> SessionOutcome {
        SessionOutcome::CriteriaUpdated {
            criteria: self.builder.criteria().to_string(),
            show_operators: self.builder.operators_visible(),
        }
    }

    fn filters_outcome(&self) -> SessionOutcome {
        SessionOutcome::FiltersUpdated {
            selected: self
                .selected_filters
                .iter()
                .map(|o| o.name.clone())
                .collect(),
        }
    }

    fn selection_outcome(&self) -> SessionOutcome {
        SessionOutcome::SelectionChanged {
            count: self.selection.count(),
            label: self.selection.label(),
        }
    }

    /// End the session view: forget results, query and selection
    ///
    /// Inputs (text, criteria, filters, display options) are kept.
    pub fn reset(&mut self) {
        self.active = None;
        self.results = None;
        self.current_page = 1;
        self.selection.clear();
        self.select_all_checked = false;
        self.in_flight.clear();
    }

    /// Current criteria string
    #[must_use]
    pub fn criteria(&self) -> &str {
        self.builder.criteria()
    }

    /// Default filter criteria for the current inputs
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Filter` if the inputs are invalid.
    pub fn default_filter_criteria(&self) -> Result<String> {
        Ok(filters::compose(
            &self.selected_filters,
            Some(&self.custom_range),
            self.current_year,
        )?)
    }

    /// Query of the last search
    #[must_use]
    pub const fn active_search(&self) -> Option<&ActiveSearch> {
        self.active.as_ref()
    }

    /// Current result page
    #[must_use]
    pub const fn results(&self) -> Option<&ResultFragment> {
        self.results.as_ref()
    }

    /// Ids on the current result page
    #[must_use]
    pub fn visible_ids(&self) -> Vec<ItemId> {
        self.results
            .as_ref()
            .map(ResultFragment::item_ids)
            .unwrap_or_default()
    }

    /// Page count reported by the server
    #[must_use]
    pub fn total_pages(&self) -> Option<u32> {
        self.results.as_ref().and_then(|r| r.total_pages)
    }

    /// One-based index of the current page
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Export selection
    #[must_use]
    pub const fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Display options
    #[must_use]
    pub const fn display(&self) -> &DisplayOptions {
        &self.display
    }

    /// Transport
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Transport, mutably
    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
