//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for nslsl using the `clap` crate.
//!
//! # Commands
//!
//! - **search**: Run a search and print one result page
//! - **harvest**: Capture every result of a search as JSON or TSV
//! - **query**: Build a structured criteria string without searching
//! - **export**: Email or download results
//! - **filters**: List or compose default filters
//! - **config**: Show the active configuration
//!
//! # Clauses
//!
//! Structured clauses are written `[OPERATOR:]FIELD=VALUE`. Range fields take
//! `FROM:TO` with either bound optional:
//!
//! ```text
//! -c Title=bone -c "or:Pub Year=1990:2000" -c "not:Keywords=rat"
//! ```

use crate::export::{ExportFormat, SelectionMode};
use crate::output::RecordFormat;
use crate::query::{FieldKind, FieldSpec, Operator, TermInput};
use crate::session::{PageFormat, PageSize};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// One `--clause` argument before its field is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseArg {
    pub operator: Operator,
    pub field: String,
    pub value: String,
}

impl ClauseArg {
    /// Term input for `field`, splitting `FROM:TO` for range fields
    ///
    /// # Errors
    ///
    /// Returns a description if a range bound is not a number.
    pub fn term_for(&self, field: &FieldSpec) -> Result<TermInput, String> {
        match field.kind {
            FieldKind::String => Ok(TermInput::text(&self.value)),
            FieldKind::Range => {
                let (from, to) = match self.value.split_once(':') {
                    Some((from, to)) => (parse_bound(from)?, parse_bound(to)?),
                    None => {
                        let year = parse_bound(&self.value)?;
                        (year, year)
                    }
                };
                Ok(TermInput::range(from, to))
            }
        }
    }
}

fn parse_bound(raw: &str) -> Result<Option<u32>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| format!("'{raw}' is not a valid range bound"))
}

/// Parse `[OPERATOR:]FIELD=VALUE`
///
/// # Errors
///
/// Returns a description of the problem for clap to report.
pub fn parse_clause(raw: &str) -> Result<ClauseArg, String> {
    let (lhs, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;

    let (operator, field) = match lhs.split_once(':') {
        Some((op, field)) => (op.parse::<Operator>().map_err(|e| e.to_string())?, field),
        None => (Operator::default(), lhs),
    };

    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }

    Ok(ClauseArg {
        operator,
        field: field.to_string(),
        value: value.trim().to_string(),
    })
}

fn parse_page_size(raw: &str) -> Result<PageSize, String> {
    let size: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    PageSize::try_from(size)
}

/// Query inputs shared by every command that searches
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Free-text query (used when no --clause is given)
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Structured clause, [OPERATOR:]FIELD=VALUE (repeatable)
    #[arg(short = 'c', long = "clause", value_name = "CLAUSE", value_parser = parse_clause)]
    pub clauses: Vec<ClauseArg>,

    /// Default filter option by name (repeatable)
    #[arg(short = 'f', long = "filter", value_name = "NAME")]
    pub filters: Vec<String>,

    /// Custom range: first publication year
    #[arg(long = "from", value_name = "YEAR")]
    pub from_year: Option<u32>,

    /// Custom range: last publication year
    #[arg(long = "to-year", value_name = "YEAR")]
    pub to_year: Option<u32>,

    /// Results per page (10, 20, 50, 100, 200, 500 or 1000)
    #[arg(short = 'n', long = "page-size", value_name = "N", value_parser = parse_page_size)]
    pub page_size: Option<PageSize>,

    /// Result layout
    #[arg(long = "layout", value_enum)]
    pub layout: Option<PageFormat>,

    /// Sort field
    #[arg(long = "sort-by", value_name = "FIELD")]
    pub sort_by: Option<String>,

    /// Sort descending
    #[arg(long = "descending")]
    pub descending: bool,
}

impl SearchArgs {
    /// Whether a custom year range was given
    #[must_use]
    pub const fn has_custom_range(&self) -> bool {
        self.from_year.is_some() || self.to_year.is_some()
    }
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "nslsl")]
#[command(about = "Search the NASA Space Life Sciences Library", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log more (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Use this configuration file instead of the default
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a search and print a result page
    #[command(visible_alias = "s")]
    Search {
        #[command(flatten)]
        search: SearchArgs,

        /// Page to show
        #[arg(short = 'p', long = "page", default_value_t = 1)]
        page: u32,
    },

    /// Capture every result of a search
    #[command(visible_alias = "h")]
    Harvest {
        #[command(flatten)]
        search: SearchArgs,

        /// Output file (stdout if not specified)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long = "format", value_enum, default_value_t = RecordFormat::Json)]
        format: RecordFormat,

        /// Stop after this many pages
        #[arg(long = "max-pages", value_name = "N")]
        max_pages: Option<u32>,
    },

    /// Build a criteria string from clauses without searching
    #[command(visible_alias = "q")]
    Query {
        /// Clauses, [OPERATOR:]FIELD=VALUE
        #[arg(value_name = "CLAUSE", required = true, value_parser = parse_clause)]
        clauses: Vec<ClauseArg>,
    },

    /// Email or download results
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },

    /// Default filter options
    Filters {
        #[command(subcommand)]
        command: FilterCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Export inputs shared by email and save
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Which results to export
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = SelectionMode::AllOnPage)]
    pub mode: SelectionMode,

    /// Export format
    #[arg(long = "format", value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Result page the export refers to
    #[arg(short = 'p', long = "page", default_value_t = 1)]
    pub page: u32,

    /// Result id to select (repeatable; used with --mode selected)
    #[arg(long = "id", value_name = "ID")]
    pub ids: Vec<String>,
}

/// Export subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ExportCommands {
    /// Email results
    Email {
        #[command(flatten)]
        args: ExportArgs,

        /// Recipient address (prompted for if omitted)
        #[arg(long = "to", value_name = "EMAIL")]
        to: Option<String>,
    },

    /// Download results to a file
    Save {
        #[command(flatten)]
        args: ExportArgs,

        /// Directory to write to (overrides config)
        #[arg(short = 'd', long = "dir")]
        dir: Option<PathBuf>,
    },
}

/// Filter subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FilterCommands {
    /// List configured filter options
    #[command(visible_alias = "ls")]
    List,

    /// Print the default filter criteria for a selection
    Compose {
        /// Filter option names
        #[arg(value_name = "NAME")]
        names: Vec<String>,

        /// Custom range: first publication year
        #[arg(long = "from", value_name = "YEAR")]
        from_year: Option<u32>,

        /// Custom range: last publication year
        #[arg(long = "to-year", value_name = "YEAR")]
        to_year: Option<u32>,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the active configuration
    Show,

    /// Print the configuration file path
    Path,
}
