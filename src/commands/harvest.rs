//! Harvest command - capture every result of a query
//!
//! The first page comes from the search itself; later pages are fetched one
//! at a time with a pause in between. Records are de-duplicated by id and the
//! captured count is checked against the total the server reported.

use super::prepare;
use crate::{
    NslslError,
    cli::SearchArgs,
    client::{
        ClientError, SearchBackend,
        http::site_root,
    },
    config::NslslConfig,
    output::{HarvestRecord, OutputWriter, RecordFormat, write_records},
    session::{SearchSession, SessionAction, SessionOutcome},
};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

type Result<T> = std::result::Result<T, NslslError>;

/// What a harvest captured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Harvest {
    pub records: Vec<HarvestRecord>,
    /// Total the server reported, if any
    pub reported_total: Option<u64>,
    pub pages_fetched: u32,
}

impl Harvest {
    /// Whether the captured count differs from the reported total
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.reported_total
            .is_some_and(|total| total != self.records.len() as u64)
    }
}

/// Fetch every page of the prepared query
///
/// # Errors
///
/// Returns an error if a request fails after its retries, or
/// `ClientError::UnexpectedResponse` if a page does not report its totals.
pub fn collect<B: SearchBackend>(
    session: &mut SearchSession<B>,
    base_url: &str,
    delay: Duration,
    max_pages: Option<u32>,
) -> Result<Harvest> {
    let root = site_root(base_url)?;
    let outcome = session.dispatch(SessionAction::Search)?;
    if let SessionOutcome::Redirect { url } = outcome {
        return Err(NslslError::InvalidInput(format!(
            "Search redirected to {url}; nothing to harvest"
        )));
    }

    let mut seen = HashSet::new();
    let mut harvest = Harvest {
        pages_fetched: 1,
        ..Harvest::default()
    };
    harvest.reported_total = Some(absorb(
        session,
        "SearchAjax",
        &root,
        &mut seen,
        &mut harvest.records,
    )?);

    let total_pages = session.total_pages().unwrap_or(1);
    let last_page = max_pages.map_or(total_pages, |max| total_pages.min(max.max(1)));
    info!(total_pages, last_page, reported = ?harvest.reported_total, "harvesting");

    for page in 2..=last_page {
        thread::sleep(delay);
        session.dispatch(SessionAction::FetchPage(page))?;
        harvest.pages_fetched += 1;
        let before = harvest.records.len();
        absorb(session, "FetchPageAjax", &root, &mut seen, &mut harvest.records)?;
        info!(page, new = harvest.records.len() - before, "page captured");
    }

    if harvest.is_incomplete() && max_pages.is_none() {
        warn!(
            captured = harvest.records.len(),
            reported = ?harvest.reported_total,
            "captured count differs from reported total"
        );
    }
    Ok(harvest)
}

/// Take the new records of the current page; returns its reported total
fn absorb<B: SearchBackend>(
    session: &SearchSession<B>,
    endpoint: &str,
    root: &Url,
    seen: &mut HashSet<String>,
    records: &mut Vec<HarvestRecord>,
) -> Result<u64> {
    let Some(results) = session.results() else {
        return Err(ClientError::unexpected(endpoint, "no result page").into());
    };
    let (Some(total), Some(_)) = (results.total_results, results.total_pages) else {
        return Err(ClientError::unexpected(endpoint, "result page reports no totals").into());
    };

    for record in &results.records {
        if seen.insert(record.id.to_string()) {
            records.push(HarvestRecord::from_result(record, root)?);
        }
    }
    Ok(total)
}

/// Execute the harvest command
///
/// # Errors
///
/// Returns an error if the inputs are invalid, a request fails, or the output
/// cannot be written.
pub fn execute<B: SearchBackend>(
    session: &mut SearchSession<B>,
    config: &NslslConfig,
    args: &SearchArgs,
    destination: Option<&Path>,
    format: RecordFormat,
    max_pages: Option<u32>,
    output: &dyn OutputWriter,
) -> Result<()> {
    prepare(session, config, args)?;

    let delay = Duration::from_millis(config.request_delay_ms);
    let harvest = collect(session, &config.base_url, delay, max_pages)?;

    match destination {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            write_records(file, &harvest.records, format)?;
            output.success(&format!(
                "Wrote {} records to {}",
                harvest.records.len(),
                path.display()
            ));
        }
        None => write_records(io::stdout().lock(), &harvest.records, format)?,
    }

    if harvest.is_incomplete() && max_pages.is_none() {
        output.warning(&format!(
            "Captured {} records but the search reported {}",
            harvest.records.len(),
            harvest.reported_total.unwrap_or_default()
        ));
    }
    output.info(&format!("Fetched {} page(s)", harvest.pages_fetched));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockBackend, ResultFragment};
    use crate::output::ToastWriter;
    use crate::testing::fragment_with_ids;
    use tempfile::TempDir;

    fn session(pages: Vec<ResultFragment>) -> SearchSession<MockBackend> {
        SearchSession::new(MockBackend::with_pages(pages), NslslConfig::default().display())
    }

    fn prepared(pages: Vec<ResultFragment>) -> SearchSession<MockBackend> {
        let mut s = session(pages);
        s.dispatch(SessionAction::SetSearchText("space".into())).unwrap();
        s
    }

    #[test]
    fn test_collects_every_page() {
        let mut s = prepared(vec![
            fragment_with_ids(&["1", "2"], 5),
            fragment_with_ids(&["3", "4"], 5),
            fragment_with_ids(&["5"], 5),
        ]);

        let harvest = collect(&mut s, "https://example.org/NSLSL", Duration::ZERO, None).unwrap();

        let ids: Vec<_> = harvest.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(harvest.pages_fetched, 3);
        assert!(!harvest.is_incomplete());
        assert_eq!(s.backend().call_count("SearchAjax"), 1);
        assert_eq!(s.backend().call_count("FetchPageAjax"), 2);
        assert_eq!(
            harvest.records[4].detail_url,
            "https://example.org/NSLSL/Search/DetailsForId/5"
        );
    }

    #[test]
    fn test_duplicates_dropped_and_mismatch_detected() {
        let mut s = prepared(vec![
            fragment_with_ids(&["1", "2"], 4),
            fragment_with_ids(&["2", "3"], 4),
        ]);

        let harvest = collect(&mut s, "https://example.org", Duration::ZERO, None).unwrap();
        assert_eq!(harvest.records.len(), 3);
        assert_eq!(harvest.reported_total, Some(4));
        assert!(harvest.is_incomplete());
    }

    #[test]
    fn test_max_pages() {
        let mut s = prepared(vec![
            fragment_with_ids(&["1"], 3),
            fragment_with_ids(&["2"], 3),
            fragment_with_ids(&["3"], 3),
        ]);

        let harvest = collect(&mut s, "https://example.org", Duration::ZERO, Some(2)).unwrap();
        assert_eq!(harvest.records.len(), 2);
        assert_eq!(s.backend().call_count("FetchPageAjax"), 1);
    }

    #[test]
    fn test_page_without_totals_is_an_error() {
        let mut s = prepared(vec![ResultFragment::parse(
            "<html><h1>Server Error in '/NSLSL' Application.</h1></html>",
        )]);

        let err = collect(&mut s, "https://example.org", Duration::ZERO, None).unwrap_err();
        assert!(matches!(
            err,
            NslslError::Client(ClientError::UnexpectedResponse { .. })
        ));
    }

    #[test]
    fn test_later_page_without_totals_is_an_error() {
        let mut s = prepared(vec![
            fragment_with_ids(&["1"], 2),
            ResultFragment::parse("<p>Service unavailable</p>"),
        ]);

        assert!(matches!(
            collect(&mut s, "https://example.org", Duration::ZERO, None),
            Err(NslslError::Client(ClientError::UnexpectedResponse { .. }))
        ));
        assert_eq!(s.backend().call_count("FetchPageAjax"), 1);
    }

    #[test]
    fn test_redirect_is_an_error() {
        let mut s = prepared(vec![]);
        s.backend_mut().redirect = Some("/NSLSL/Search/DetailsForId/1".into());
        assert!(matches!(
            collect(&mut s, "https://example.org", Duration::ZERO, None),
            Err(NslslError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_execute_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.tsv");
        let mut config = NslslConfig::default();
        config.request_delay_ms = 0;
        let mut s = session(vec![fragment_with_ids(&["8", "9"], 2)]);
        let out = ToastWriter::new();
        let args = SearchArgs {
            query: Some("space".into()),
            ..SearchArgs::default()
        };

        execute(&mut s, &config, &args, Some(&path), RecordFormat::Tsv, None, &out).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("id\ttitle\tdetail_url\n8\t"));
    }
}
