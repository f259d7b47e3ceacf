//! Boolean composition of query clauses

use super::clause::QueryClause;
use super::error::QueryError;
use std::fmt;
use std::str::FromStr;

/// Operator joining the existing criteria with a new clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    #[default]
    And,
    Or,
    AndNot,
}

impl Operator {
    /// Keyword as it appears in the criteria string
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::AndNot => "AND NOT",
        }
    }

    /// All operators, in the order the search form offers them
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::And, Self::Or, Self::AndNot]
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_'], " ");
        match normalized.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["and"] => Ok(Self::And),
            ["or"] => Ok(Self::Or),
            ["not"] | ["and", "not"] => Ok(Self::AndNot),
            _ => Err(QueryError::UnknownOperator(s.to_string())),
        }
    }
}

/// Tree form of the criteria string
///
/// Each composite parenthesizes both sides, so rendering never produces
/// unbalanced parentheses and a lone clause is never wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryExpression {
    Clause(QueryClause),
    Composite {
        left: Box<QueryExpression>,
        operator: Operator,
        right: Box<QueryExpression>,
    },
}

impl QueryExpression {
    /// Combine this expression with another clause
    #[must_use]
    pub fn then(self, operator: Operator, clause: QueryClause) -> Self {
        Self::Composite {
            left: Box::new(self),
            operator,
            right: Box::new(Self::Clause(clause)),
        }
    }

    /// Number of clauses in the tree
    #[must_use]
    pub fn clause_count(&self) -> usize {
        match self {
            Self::Clause(_) => 1,
            Self::Composite { left, right, .. } => left.clause_count() + right.clause_count(),
        }
    }
}

impl From<QueryClause> for QueryExpression {
    fn from(clause: QueryClause) -> Self {
        Self::Clause(clause)
    }
}

impl fmt::Display for QueryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clause(clause) => write!(f, "{clause}"),
            Self::Composite {
                left,
                operator,
                right,
            } => write!(f, "({left}) {operator} ({right})"),
        }
    }
}

/// Check that every `(` in `criteria` is closed in order
#[must_use]
pub fn is_balanced(criteria: &str) -> bool {
    let mut depth: usize = 0;
    for ch in criteria.chars() {
        match ch {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(next) => depth = next,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parsing() {
        assert_eq!("and".parse::<Operator>().unwrap(), Operator::And);
        assert_eq!("OR".parse::<Operator>().unwrap(), Operator::Or);
        assert_eq!("and-not".parse::<Operator>().unwrap(), Operator::AndNot);
        assert_eq!("AND NOT".parse::<Operator>().unwrap(), Operator::AndNot);
        assert_eq!("not".parse::<Operator>().unwrap(), Operator::AndNot);
        assert!("xor".parse::<Operator>().is_err());
    }

    #[test]
    fn test_single_clause_not_parenthesized() {
        let expr = QueryExpression::from(QueryClause::contains("Title", "bone"));
        assert_eq!(expr.to_string(), "bone[Title]");
    }

    #[test]
    fn test_composite_rendering() {
        let expr = QueryExpression::from(QueryClause::contains("Title", "bone"))
            .then(Operator::AndNot, QueryClause::range("Pub Year", 1990, 2000))
            .then(Operator::Or, QueryClause::not_empty("Abstract"));

        assert_eq!(
            expr.to_string(),
            "((bone[Title]) AND NOT (1990:2000[Pub Year])) OR (NOTEMPTY([Abstract]))"
        );
        assert_eq!(expr.clause_count(), 3);
        assert!(is_balanced(&expr.to_string()));
    }

    #[test]
    fn test_is_balanced() {
        assert!(is_balanced(""));
        assert!(is_balanced("(a) OR (b)"));
        assert!(!is_balanced("(a"));
        assert!(!is_balanced(")a("));
    }
}
