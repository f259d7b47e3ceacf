//! Search controller transport
//!
//! `SearchBackend` has one method per controller endpoint. The session
//! controller only talks to this trait, so tests drive it with
//! [`MockBackend`] and the CLI with [`HttpBackend`].
//!
//! | Endpoint                    | Method                     | Response          |
//! |-----------------------------|----------------------------|-------------------|
//! | `SearchAjax`                | [`SearchBackend::search`]  | fragment/redirect |
//! | `FetchPageAjax`             | `fetch_page`               | fragment          |
//! | `ChangeDisplayOptionsAjax`  | `change_display_options`   | fragment          |
//! | `AdvancedSearchAjax`        | `advanced_search_form`     | form fragment     |
//! | `SelectAllCheckedAjax`      | `select_all_ids`           | id list           |
//! | `EmailSearchResults`        | `email_results`            | success flag      |
//! | `DownloadSearchResults`     | `download_results`         | base64 file       |

pub mod error;
pub mod fragment;
pub mod http;
pub mod mock;

pub use error::ClientError;
pub use fragment::{ResultFragment, ResultRecord};
pub use http::HttpBackend;
pub use mock::MockBackend;

use crate::selection::ItemId;
use crate::session::SearchRequest;
use serde::Deserialize;

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Answer to a new search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResponse {
    /// Result list to display
    Results(ResultFragment),
    /// The server wants the browser elsewhere (e.g. a single exact match)
    Redirect { url: String },
}

/// Operations offered by the search controller
pub trait SearchBackend {
    /// Run a new search
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or server failure.
    fn search(&mut self, request: &SearchRequest) -> Result<SearchResponse>;

    /// Fetch another page of the current search
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or server failure.
    fn fetch_page(&mut self, request: &SearchRequest) -> Result<ResultFragment>;

    /// Re-render the current search with new sort/layout settings
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or server failure.
    fn change_display_options(&mut self, request: &SearchRequest) -> Result<ResultFragment>;

    /// Fetch the advanced search form
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or server failure.
    fn advanced_search_form(&mut self) -> Result<String>;

    /// Ids of every result matching the request
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or server failure.
    fn select_all_ids(&mut self, request: &SearchRequest) -> Result<Vec<ItemId>>;

    /// Ask the server to email results; returns the server's success flag
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or server failure.
    fn email_results(&mut self, request: &SearchRequest) -> Result<bool>;

    /// Generate an export file; returns the base64 payload
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or server failure.
    fn download_results(&mut self, request: &SearchRequest) -> Result<String>;
}

/// Interpret a `SearchAjax` body
pub(crate) fn parse_search_body(body: &str) -> Result<SearchResponse> {
    #[derive(Deserialize)]
    struct Redirect {
        result: String,
        url: String,
    }

    if body.trim_start().starts_with('{')
        && let Ok(redirect) = serde_json::from_str::<Redirect>(body)
        && redirect.result.eq_ignore_ascii_case("redirect")
    {
        return Ok(SearchResponse::Redirect { url: redirect.url });
    }
    ResultFragment::parse_page("SearchAjax", body).map(SearchResponse::Results)
}

/// Interpret a `SelectAllCheckedAjax` body
pub(crate) fn parse_id_list(endpoint: &str, body: &str) -> Result<Vec<ItemId>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdList {
        Bare(Vec<ItemId>),
        Wrapped {
            #[serde(alias = "Ids")]
            ids: Vec<ItemId>,
        },
    }

    match serde_json::from_str::<IdList>(body) {
        Ok(IdList::Bare(ids) | IdList::Wrapped { ids }) => Ok(ids),
        Err(e) => Err(ClientError::unexpected(endpoint, e.to_string())),
    }
}

/// Interpret an `EmailSearchResults` body
pub(crate) fn parse_success_flag(endpoint: &str, body: &str) -> Result<bool> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bare(bool),
        Success {
            #[serde(alias = "Success")]
            success: bool,
        },
        Result {
            #[serde(alias = "Result")]
            result: bool,
        },
    }

    match serde_json::from_str::<Flag>(body.trim()) {
        Ok(Flag::Bare(flag) | Flag::Success { success: flag } | Flag::Result { result: flag }) => {
            Ok(flag)
        }
        Err(_) => match body.trim().to_ascii_lowercase().as_str() {
            "true" | "\"true\"" => Ok(true),
            "false" | "\"false\"" => Ok(false),
            other => Err(ClientError::unexpected(
                endpoint,
                format!("expected a success flag, got '{other}'"),
            )),
        },
    }
}
