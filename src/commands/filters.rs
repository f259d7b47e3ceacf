//! Filters command - list and compose default filters

use crate::{
    NslslError,
    cli::FilterCommands,
    config::NslslConfig,
    filters::{self, FilterKind, FilterOption, YearRange},
    output::OutputWriter,
};
use colored::Colorize;

type Result<T> = std::result::Result<T, NslslError>;

/// Execute a filters subcommand
///
/// # Errors
///
/// Returns an error for unknown filter names or an invalid year range.
pub fn execute(
    config: &NslslConfig,
    command: &FilterCommands,
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    match command {
        FilterCommands::List => {
            list(config, output, quiet);
            Ok(())
        }
        FilterCommands::Compose {
            names,
            from_year,
            to_year,
        } => {
            let criteria = compose(config, names, *from_year, *to_year)?;
            output.write(&criteria);
            Ok(())
        }
    }
}

fn list(config: &NslslConfig, output: &dyn OutputWriter, quiet: bool) {
    if config.filters.is_empty() {
        if !quiet {
            output.info("No filter options configured.");
        }
        return;
    }

    for option in config.filters.options() {
        if quiet {
            output.write(&option.name);
        } else {
            output.write(&format!(
                "  {} {} {}",
                option.name.cyan(),
                describe(option).dimmed(),
                option.description
            ));
        }
    }
}

fn describe(option: &FilterOption) -> String {
    match option.kind {
        FilterKind::YearWithinLastN => format!("(last {} years)", option.value),
        FilterKind::NotEmpty => format!("(has {})", option.value),
        FilterKind::Contains => format!("({} contains {})", option.field, option.value),
    }
}

/// Default filter criteria for named options and an optional year range
///
/// # Errors
///
/// Returns `NslslError::Filter` for unknown names or an invalid range.
pub fn compose(
    config: &NslslConfig,
    names: &[String],
    from_year: Option<u32>,
    to_year: Option<u32>,
) -> Result<String> {
    let selected = config.filters.select(names)?;
    let range = (from_year.is_some() || to_year.is_some())
        .then(|| YearRange::new(from_year, to_year));
    Ok(filters::compose_now(&selected, range.as_ref())?)
}
