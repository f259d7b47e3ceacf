//! HTTP implementation of `SearchBackend`
//!
//! Uses a blocking `reqwest` client with a cookie store. The search page is
//! loaded once to obtain the anti-forgery token; every POST then carries it.
//! Failed requests are retried with a linear backoff.

use super::error::ClientError;
use super::fragment::{ResultFragment, input_value};
use super::{
    Result, SearchBackend, SearchResponse, parse_id_list, parse_search_body, parse_success_flag,
};
use crate::config::NslslConfig;
use crate::selection::ItemId;
use crate::session::SearchRequest;
use reqwest::blocking::{Client, Response};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const TOKEN_FIELD: &str = "__RequestVerificationToken";

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Site root, e.g. `https://extapps.ksc.nasa.gov/NSLSL`
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Pause unit between retries (multiplied by the attempt number)
    pub request_delay: Duration,
    /// Attempts per request, at least one
    pub max_retries: u32,
}

impl From<&NslslConfig> for HttpSettings {
    fn from(config: &NslslConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            request_delay: Duration::from_millis(config.request_delay_ms),
            max_retries: config.max_retries,
        }
    }
}

/// Search controller client over HTTP
pub struct HttpBackend {
    client: Client,
    settings: HttpSettings,
    root: Url,
    token: Option<String>,
}

impl HttpBackend {
    /// Create a client
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` for an unusable base URL and
    /// `ClientError::Http` if the underlying client cannot be built.
    pub fn new(settings: HttpSettings) -> Result<Self> {
        let root = site_root(&settings.base_url)?;
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            settings,
            root,
            token: None,
        })
    }

    /// Connection settings in use
    #[must_use]
    pub const fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    fn endpoint(&self, name: &str) -> Result<Url> {
        resolve(&self.root, &format!("Search/{name}"))
    }

    /// Run `send` until it succeeds or the attempts are used up
    fn with_retries<T>(&self, label: &str, mut send: impl FnMut() -> Result<T>) -> Result<T> {
        let attempts = self.settings.max_retries.max(1);
        let mut attempt = 1;
        loop {
            match send() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    let backoff = self.settings.request_delay * attempt;
                    warn!(%label, attempt, error = %e, ?backoff, "request failed, retrying");
                    thread::sleep(backoff);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn token(&mut self) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        let url = resolve(&self.root, "Search")?;
        info!(%url, "loading search page for anti-forgery token");
        let page = self.with_retries("Search", || {
            let response = self.client.get(url.clone()).send()?;
            read_body("Search", response)
        })?;

        let token = input_value(&page, TOKEN_FIELD).ok_or(ClientError::MissingToken)?;
        self.token = Some(token.clone());
        Ok(token)
    }

    fn post(&mut self, name: &str, mut form: Vec<(String, String)>) -> Result<String> {
        let token = self.token()?;
        form.insert(0, (TOKEN_FIELD.to_string(), token));

        let url = self.endpoint(name)?;
        debug!(%url, fields = form.len(), "posting");
        self.with_retries(name, || {
            let response = self.client.post(url.clone()).form(&form).send()?;
            read_body(name, response)
        })
    }
}

fn read_body(endpoint: &str, response: Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text()?)
}

impl SearchBackend for HttpBackend {
    fn search(&mut self, request: &SearchRequest) -> Result<SearchResponse> {
        let body = self.post("SearchAjax", request.to_form())?;
        parse_search_body(&body)
    }

    fn fetch_page(&mut self, request: &SearchRequest) -> Result<ResultFragment> {
        let body = self.post("FetchPageAjax", request.to_form())?;
        ResultFragment::parse_page("FetchPageAjax", &body)
    }

    fn change_display_options(&mut self, request: &SearchRequest) -> Result<ResultFragment> {
        let body = self.post("ChangeDisplayOptionsAjax", request.to_form())?;
        ResultFragment::parse_page("ChangeDisplayOptionsAjax", &body)
    }

    fn advanced_search_form(&mut self) -> Result<String> {
        self.post("AdvancedSearchAjax", Vec::new())
    }

    fn select_all_ids(&mut self, request: &SearchRequest) -> Result<Vec<ItemId>> {
        let body = self.post("SelectAllCheckedAjax", request.to_form())?;
        parse_id_list("SelectAllCheckedAjax", &body)
    }

    fn email_results(&mut self, request: &SearchRequest) -> Result<bool> {
        let body = self.post("EmailSearchResults", request.to_form())?;
        parse_success_flag("EmailSearchResults", &body)
    }

    fn download_results(&mut self, request: &SearchRequest) -> Result<String> {
        self.post("DownloadSearchResults", request.to_form())
    }
}

/// Site root as a base for relative addresses
///
/// The path always ends in `/` so relative joins land under the application
/// path. Query and fragment are dropped.
///
/// # Errors
///
/// Returns `ClientError::InvalidUrl` if `base_url` is not an absolute URL.
pub fn site_root(base_url: &str) -> Result<Url> {
    let mut root = Url::parse(base_url).map_err(|source| ClientError::InvalidUrl {
        url: base_url.to_string(),
        source,
    })?;
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    root.set_query(None);
    root.set_fragment(None);
    Ok(root)
}

/// Resolve `target` the way a browser would from the site root
///
/// # Errors
///
/// Returns `ClientError::InvalidUrl` if `target` cannot be resolved.
pub fn resolve(root: &Url, target: &str) -> Result<Url> {
    root.join(target).map_err(|source| ClientError::InvalidUrl {
        url: target.to_string(),
        source,
    })
}

/// Public page for a single result
///
/// # Errors
///
/// Returns `ClientError::InvalidUrl` if the id does not form a valid path.
pub fn detail_url(root: &Url, id: &ItemId) -> Result<Url> {
    resolve(root, &format!("Search/DetailsForId/{id}"))
}
