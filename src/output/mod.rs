//! Output formatting for CLI display
//!
//! Result lines, page summaries and the notice writers commands report
//! through.

pub mod notices;
pub mod records;

pub use notices::{
    MessageLevel, OVERSIZED_HINT, OutputWriter, StdoutWriter, ToastWriter, report_error,
};
pub use records::{HarvestRecord, RecordFormat, write_json, write_records, write_tsv};

use crate::client::ResultRecord;
use colored::Colorize;

/// Format one result for display
///
/// Selected results are marked; quiet output is the bare id.
#[must_use]
pub fn result_line(record: &ResultRecord, selected: bool, quiet: bool) -> String {
    if quiet {
        return record.id.to_string();
    }
    let mark = if selected { "[x]" } else { "[ ]" };
    format!(
        "  {} {} {}",
        mark,
        record.id.as_str().cyan(),
        record.title
    )
}

/// Summary line under a result page
#[must_use]
pub fn page_summary(page: u32, total_pages: Option<u32>, total_results: Option<u64>) -> String {
    let pages = total_pages.map_or_else(|| "?".to_string(), |p| p.to_string());
    match total_results {
        Some(total) => format!("Page {page} of {pages} ({total} results)"),
        None => format!("Page {page} of {pages}"),
    }
}
