//! Mock search controller for testing

use super::error::ClientError;
use super::fragment::ResultFragment;
use super::{Result, SearchBackend, SearchResponse};
use crate::selection::ItemId;
use crate::session::SearchRequest;

/// A recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub endpoint: &'static str,
    pub request: Option<SearchRequest>,
}

/// Backend that answers from predetermined data and records every call
///
/// Pages are served by `current_page`; a page past the end is empty.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    /// Result pages, first page at index 0
    pub pages: Vec<ResultFragment>,
    /// Redirect returned by `search` instead of the first page
    pub redirect: Option<String>,
    /// Answer of `select_all_ids`
    pub all_ids: Vec<ItemId>,
    /// Answer of `email_results`
    pub email_accepted: bool,
    /// Answer of `download_results`
    pub download_payload: String,
    /// Answer of `advanced_search_form`
    pub advanced_form: String,
    /// When set, every call fails with this status
    pub fail_with_status: Option<u16>,
    /// Calls in order
    pub calls: Vec<MockCall>,
}

impl MockBackend {
    /// Backend serving the given pages
    #[must_use]
    pub fn with_pages(pages: Vec<ResultFragment>) -> Self {
        Self {
            pages,
            email_accepted: true,
            ..Self::default()
        }
    }

    /// Backend whose every call fails
    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::default()
        }
    }

    /// Number of calls made to `endpoint`
    #[must_use]
    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls.iter().filter(|c| c.endpoint == endpoint).count()
    }

    /// Most recent request sent to `endpoint`
    #[must_use]
    pub fn last_request(&self, endpoint: &str) -> Option<&SearchRequest> {
        self.calls
            .iter()
            .rev()
            .filter(|c| c.endpoint == endpoint)
            .find_map(|c| c.request.as_ref())
    }

    fn record(&mut self, endpoint: &'static str, request: Option<&SearchRequest>) -> Result<()> {
        self.calls.push(MockCall {
            endpoint,
            request: request.cloned(),
        });
        match self.fail_with_status {
            Some(status) => Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status,
            }),
            None => Ok(()),
        }
    }

    fn page(&self, request: &SearchRequest) -> ResultFragment {
        let index = request.current_page.max(1) as usize - 1;
        self.pages.get(index).cloned().unwrap_or_default()
    }
}

impl SearchBackend for MockBackend {
    fn search(&mut self, request: &SearchRequest) -> Result<SearchResponse> {
        self.record("SearchAjax", Some(request))?;
        Ok(match &self.redirect {
            Some(url) => SearchResponse::Redirect { url: url.clone() },
            None => SearchResponse::Results(self.page(request)),
        })
    }

    fn fetch_page(&mut self, request: &SearchRequest) -> Result<ResultFragment> {
        self.record("FetchPageAjax", Some(request))?;
        Ok(self.page(request))
    }

    fn change_display_options(&mut self, request: &SearchRequest) -> Result<ResultFragment> {
        self.record("ChangeDisplayOptionsAjax", Some(request))?;
        Ok(self.page(request))
    }

    fn advanced_search_form(&mut self) -> Result<String> {
        self.record("AdvancedSearchAjax", None)?;
        Ok(self.advanced_form.clone())
    }

    fn select_all_ids(&mut self, request: &SearchRequest) -> Result<Vec<ItemId>> {
        self.record("SelectAllCheckedAjax", Some(request))?;
        Ok(self.all_ids.clone())
    }

    fn email_results(&mut self, request: &SearchRequest) -> Result<bool> {
        self.record("EmailSearchResults", Some(request))?;
        Ok(self.email_accepted)
    }

    fn download_results(&mut self, request: &SearchRequest) -> Result<String> {
        self.record("DownloadSearchResults", Some(request))?;
        Ok(self.download_payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DisplayOptions;
    use crate::testing::fragment_with_ids;

    #[test]
    fn test_mock_serves_pages_by_number() {
        let mut backend =
            MockBackend::with_pages(vec![fragment_with_ids(&["1"], 2), fragment_with_ids(&["2"], 2)]);
        let request = SearchRequest::new("x", DisplayOptions::default()).with_page(2);

        let page = backend.fetch_page(&request).unwrap();
        assert_eq!(page.item_ids(), vec![ItemId::from("2")]);

        let past_end = backend.fetch_page(&request.clone().with_page(9)).unwrap();
        assert!(past_end.records.is_empty());
        assert_eq!(backend.call_count("FetchPageAjax"), 2);
    }

    #[test]
    fn test_mock_failure() {
        let mut backend = MockBackend::failing(500);
        let err = backend.advanced_search_form().unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, .. }));
        assert_eq!(backend.call_count("AdvancedSearchAjax"), 1);
    }
}
