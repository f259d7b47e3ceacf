//! Query command - build a criteria string without searching

use super::resolve_clause;
use crate::{
    NslslError,
    cli::ClauseArg,
    config::NslslConfig,
    output::OutputWriter,
    query::QueryCriteriaBuilder,
};

type Result<T> = std::result::Result<T, NslslError>;

/// Build the criteria for `clauses`
///
/// # Errors
///
/// Returns an error for unknown fields or invalid clause input.
pub fn build(config: &NslslConfig, clauses: &[ClauseArg]) -> Result<String> {
    let mut builder = QueryCriteriaBuilder::new();
    for clause in clauses {
        let (field, term) = resolve_clause(config, clause)?;
        builder.push(&field, &term, clause.operator)?;
    }
    Ok(builder.criteria().to_string())
}

/// Execute the query command
///
/// # Errors
///
/// See [`build`].
pub fn execute(
    config: &NslslConfig,
    clauses: &[ClauseArg],
    output: &dyn OutputWriter,
) -> Result<()> {
    output.write(&build(config, clauses)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse_clause;

    fn clauses(raw: &[&str]) -> Vec<ClauseArg> {
        raw.iter().map(|r| parse_clause(r).unwrap()).collect()
    }

    #[test]
    fn test_build() {
        let config = NslslConfig::default();
        let criteria = build(
            &config,
            &clauses(&["title=bone", "or:Author=Smith", "not:Pub Year=:1980"]),
        )
        .unwrap();
        assert_eq!(
            criteria,
            "((bone[Title]) OR (Smith[Author])) AND NOT (0:1980[Pub Year])"
        );
    }

    #[test]
    fn test_empty_term_rejected() {
        let config = NslslConfig::default();
        let err = build(&config, &clauses(&["Title="])).unwrap_err();
        assert!(matches!(err, NslslError::Query(_)));
    }
}
