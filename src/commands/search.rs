//! Search command - run a query and print one result page

use super::prepare;
use crate::{
    NslslError,
    cli::SearchArgs,
    client::{
        SearchBackend,
        http::{resolve, site_root},
    },
    config::NslslConfig,
    output::{self, OutputWriter},
    session::{SearchSession, SessionAction, SessionOutcome},
};

type Result<T> = std::result::Result<T, NslslError>;

/// Execute the search command
///
/// # Errors
///
/// Returns an error if the inputs are invalid or the search fails.
pub fn execute<B: SearchBackend>(
    session: &mut SearchSession<B>,
    config: &NslslConfig,
    args: &SearchArgs,
    page: u32,
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    prepare(session, config, args)?;

    let outcome = session.dispatch(SessionAction::Search)?;
    if let SessionOutcome::Redirect { url } = outcome {
        output.write(&absolute_url(&config.base_url, &url)?);
        return Ok(());
    }

    if page > 1 {
        session.dispatch(SessionAction::FetchPage(page))?;
    }

    print_page(session, output, quiet);
    Ok(())
}

/// Print the session's current result page
pub fn print_page<B: SearchBackend>(
    session: &SearchSession<B>,
    output: &dyn OutputWriter,
    quiet: bool,
) {
    let Some(results) = session.results() else {
        return;
    };

    if results.records.is_empty() {
        if !quiet {
            output.info("No results found.");
        }
        return;
    }

    for record in &results.records {
        let selected = session.selection().contains(&record.id);
        output.write(&output::result_line(record, selected, quiet));
    }
    if !quiet {
        output.info(&output::page_summary(
            session.current_page(),
            results.total_pages,
            results.total_results,
        ));
    }
}

/// Resolve a redirect target against the site root
///
/// # Errors
///
/// Returns `NslslError::Client` if the base URL or target is not a valid URL.
pub fn absolute_url(base_url: &str, target: &str) -> Result<String> {
    let root = site_root(base_url)?;
    Ok(resolve(&root, target)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockBackend;
    use crate::output::{MessageLevel, ToastWriter};
    use crate::testing::fragment_with_ids;

    fn session(backend: MockBackend) -> SearchSession<MockBackend> {
        SearchSession::new(backend, NslslConfig::default().display())
    }

    fn query(text: &str) -> SearchArgs {
        SearchArgs {
            query: Some(text.into()),
            ..SearchArgs::default()
        }
    }

    #[test]
    fn test_prints_requested_page() {
        let mut s = session(MockBackend::with_pages(vec![
            fragment_with_ids(&["1", "2"], 4),
            fragment_with_ids(&["3", "4"], 4),
        ]));
        let out = ToastWriter::new();

        execute(&mut s, &NslslConfig::default(), &query("space"), 2, &out, true).unwrap();

        let lines: Vec<_> = out.recent_messages().into_iter().map(|(_, m)| m).collect();
        assert_eq!(lines, vec!["3", "4"]);
        assert_eq!(s.backend().call_count("FetchPageAjax"), 1);
    }

    #[test]
    fn test_empty_results_notice() {
        let mut s = session(MockBackend::with_pages(vec![]));
        let out = ToastWriter::new();

        execute(&mut s, &NslslConfig::default(), &query("nothing"), 1, &out, false).unwrap();
        assert_eq!(
            out.latest_message(),
            Some((MessageLevel::Info, "No results found.".to_string()))
        );
    }

    #[test]
    fn test_empty_query_is_an_error() {
        let mut s = session(MockBackend::default());
        let out = ToastWriter::new();
        let err = execute(&mut s, &NslslConfig::default(), &SearchArgs::default(), 1, &out, false)
            .unwrap_err();
        assert!(matches!(err, NslslError::Session(_)));
        assert_eq!(s.backend().call_count("SearchAjax"), 0);
    }

    #[test]
    fn test_redirect_prints_url() {
        let mut backend = MockBackend::default();
        backend.redirect = Some("/NSLSL/Search/DetailsForId/9".into());
        let mut s = session(backend);
        let out = ToastWriter::new();

        execute(&mut s, &NslslConfig::default(), &query("exact"), 1, &out, true).unwrap();
        assert_eq!(
            out.latest_message().unwrap().1,
            "https://extapps.ksc.nasa.gov/NSLSL/Search/DetailsForId/9"
        );
    }

    #[test]
    fn test_absolute_url() {
        let url = |base: &str, target: &str| absolute_url(base, target).unwrap();
        let base = "https://example.org/NSLSL/";
        assert_eq!(url(base, "https://other.org/x"), "https://other.org/x");
        assert_eq!(url(base, "/NSLSL/a"), "https://example.org/NSLSL/a");
        assert_eq!(url(base, "Search/a"), "https://example.org/NSLSL/Search/a");
        assert_eq!(url(base, "//cdn.example.org/x"), "https://cdn.example.org/x");
        assert_eq!(
            url("https://example.org/NSLSL?s=1", "Search/a"),
            "https://example.org/NSLSL/Search/a"
        );
    }

    #[test]
    fn test_absolute_url_bad_base() {
        assert!(matches!(
            absolute_url("not a url", "/x"),
            Err(NslslError::Client(_))
        ));
    }
}
