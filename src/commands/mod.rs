//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs the operation. Commands that search take a
//! `SearchSession` generic over its backend so they can be driven with
//! `MockBackend` in tests.

pub mod config;
pub mod export;
pub mod filters;
pub mod harvest;
pub mod query;
pub mod search;

pub use self::config::execute as config;
pub use export::execute as export;
pub use filters::execute as filters;
pub use harvest::execute as harvest;
pub use query::execute as query;
pub use search::execute as search;

use crate::{
    NslslError,
    cli::{ClauseArg, SearchArgs},
    client::{HttpBackend, SearchBackend},
    config::NslslConfig,
    filters::YearRange,
    query::{FieldSpec, TermInput},
    session::{DisplayOptions, SearchSession, SessionAction},
};

type Result<T> = std::result::Result<T, NslslError>;

/// Open a session against the configured site
///
/// # Errors
///
/// Returns `NslslError::Client` if the HTTP client cannot be built.
pub fn open_session(config: &NslslConfig) -> Result<SearchSession<HttpBackend>> {
    let backend = HttpBackend::new(config.into())?;
    Ok(SearchSession::new(backend, config.display()))
}

/// Display options from config with command-line overrides
#[must_use]
pub fn display_options(config: &NslslConfig, args: &SearchArgs) -> DisplayOptions {
    let mut display = config.display();
    if let Some(size) = args.page_size {
        display.page_size = size;
    }
    if let Some(layout) = args.layout {
        display.page_format = layout;
    }
    if let Some(sort_by) = &args.sort_by {
        display.sort_by.clone_from(sort_by);
    }
    if args.descending {
        display.sort_ascending = false;
    }
    display
}

/// Resolve a clause's field against the configured field catalog
///
/// # Errors
///
/// Returns `NslslError::InvalidInput` for an unknown field or a bad range.
pub fn resolve_clause(
    config: &NslslConfig,
    clause: &ClauseArg,
) -> Result<(FieldSpec, TermInput)> {
    let field = config.field(&clause.field).cloned().ok_or_else(|| {
        let known: Vec<_> = config.fields.iter().map(|f| f.name.as_str()).collect();
        NslslError::InvalidInput(format!(
            "Unknown field '{}' (known fields: {})",
            clause.field,
            known.join(", ")
        ))
    })?;
    let term = clause.term_for(&field).map_err(NslslError::InvalidInput)?;
    Ok((field, term))
}

/// Load the query inputs of `args` into a session
///
/// Clauses go through the structured builder; the free-text query is only
/// searched when no clause is given.
///
/// # Errors
///
/// Returns an error for unknown fields or filters and invalid clauses.
pub fn prepare<B: SearchBackend>(
    session: &mut SearchSession<B>,
    config: &NslslConfig,
    args: &SearchArgs,
) -> Result<()> {
    if let Some(text) = &args.query {
        session.dispatch(SessionAction::SetSearchText(text.clone()))?;
    }

    for clause in &args.clauses {
        let (field, term) = resolve_clause(config, clause)?;
        session.dispatch(SessionAction::AppendClause {
            field,
            term,
            operator: clause.operator,
        })?;
    }

    for option in config.filters.select(&args.filters)? {
        session.dispatch(SessionAction::ToggleFilter(option))?;
    }

    if args.has_custom_range() {
        session.dispatch(SessionAction::SetCustomRange(YearRange::new(
            args.from_year,
            args.to_year,
        )))?;
    }

    session.dispatch(SessionAction::ChangeDisplayOptions(display_options(
        config, args,
    )))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse_clause;
    use crate::client::MockBackend;
    use crate::session::{PageFormat, PageSize};

    fn args() -> SearchArgs {
        SearchArgs {
            query: Some("ignored".into()),
            clauses: vec![
                parse_clause("Title=bone").unwrap(),
                parse_clause("or:pub year=1990:2000").unwrap(),
            ],
            filters: vec!["has-abstract".into()],
            from_year: Some(1980),
            page_size: PageSize::try_from(100).ok(),
            layout: Some(PageFormat::Abstract),
            descending: true,
            ..SearchArgs::default()
        }
    }

    #[test]
    fn test_display_overrides() {
        let display = display_options(&NslslConfig::default(), &args());
        assert_eq!(display.page_size.get(), 100);
        assert_eq!(display.page_format, PageFormat::Abstract);
        assert_eq!(display.sort_by, "PubDate");
        assert!(!display.sort_ascending);
    }

    #[test]
    fn test_prepare_loads_inputs() {
        let config = NslslConfig::default();
        let mut session = SearchSession::new(MockBackend::default(), config.display());

        prepare(&mut session, &config, &args()).unwrap();

        assert_eq!(session.criteria(), "(bone[Title]) OR (1990:2000[Pub Year])");
        assert_eq!(
            session.default_filter_criteria().unwrap(),
            "NOTEMPTY ([Abstract]) BETWEEN (1980:3000[Pub Year])"
        );
        assert_eq!(session.display().page_size.get(), 100);
        assert!(session.backend().calls.is_empty());
    }

    #[test]
    fn test_unknown_field_and_filter() {
        let config = NslslConfig::default();
        let mut session = SearchSession::new(MockBackend::default(), config.display());

        let bad_field = SearchArgs {
            clauses: vec![parse_clause("Colour=red").unwrap()],
            ..SearchArgs::default()
        };
        assert!(matches!(
            prepare(&mut session, &config, &bad_field),
            Err(NslslError::InvalidInput(_))
        ));

        let bad_filter = SearchArgs {
            filters: vec!["nope".into()],
            ..SearchArgs::default()
        };
        assert!(matches!(
            prepare(&mut session, &config, &bad_filter),
            Err(NslslError::Filter(_))
        ));
    }
}
