//! nslsl CLI application entry point
//!
//! # Usage
//!
//! ```bash
//! # Free-text search, first page
//! nslsl search "bone loss"
//!
//! # Structured query with default filters, page 2 of 50 results per page
//! nslsl search -c Title=bone -c "or:Keywords=osteoporosis" -f has-abstract -n 50 -p 2
//!
//! # Print the criteria string only
//! nslsl query Title=bone "not:Pub Year=:1980"
//!
//! # Capture every result as TSV
//! nslsl harvest "microgravity" --format tsv -o results.tsv
//!
//! # Email ticked results, download everything
//! nslsl export email space --mode selected --id 101 --id 102 --to me@example.org
//! nslsl export save space --mode all --format csv
//! ```
//!
//! # Configuration
//!
//! Stored in the user's config directory (`~/.config/nslsl/config.toml` on
//! Linux) and created with defaults on first run. `NSLSL_*` environment
//! variables override single values.

use nslsl::{
    NslslError, commands,
    cli::{Cli, Commands, ExportCommands},
    config::NslslConfig,
    export::ExportKind,
    output::{OutputWriter, StdoutWriter, report_error},
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, NslslError>;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nslsl={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<(NslslConfig, PathBuf)> {
    let path = match path {
        Some(path) => path,
        None => NslslConfig::config_path()?,
    };
    let config = NslslConfig::load_from(&path)?;
    Ok((config, path))
}

fn run(
    cli: &Cli,
    output: &dyn OutputWriter,
    quiet: bool,
    config: &NslslConfig,
    path: &Path,
) -> Result<()> {
    match &cli.command {
        Commands::Search { search, page } => {
            let mut session = commands::open_session(config)?;
            commands::search(&mut session, config, search, *page, output, quiet)
        }
        Commands::Harvest {
            search,
            output: destination,
            format,
            max_pages,
        } => {
            let mut session = commands::open_session(config)?;
            commands::harvest(
                &mut session,
                config,
                search,
                destination.as_deref(),
                *format,
                *max_pages,
                output,
            )
        }
        Commands::Query { clauses } => commands::query(config, clauses, output),
        Commands::Export { command } => {
            let mut session = commands::open_session(config)?;
            match command {
                ExportCommands::Email { args, to } => {
                    let recipient = commands::export::resolve_recipient(to.clone())?;
                    commands::export(
                        &mut session,
                        config,
                        args,
                        ExportKind::Email,
                        recipient,
                        None,
                        output,
                    )
                }
                ExportCommands::Save { args, dir } => commands::export(
                    &mut session,
                    config,
                    args,
                    ExportKind::Save,
                    None,
                    dir.as_deref(),
                    output,
                ),
            }
        }
        Commands::Filters { command } => commands::filters(config, command, output, quiet),
        Commands::Config { command } => commands::config(config, path, command, output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let (config, path) = match load_config(cli.config.clone()) {
        Ok(loaded) => loaded,
        Err(e) => {
            StdoutWriter::new().error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let quiet = cli.quiet || config.quiet;
    let output = StdoutWriter::quiet(quiet);

    match run(&cli, &output, quiet, &config, &path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(NslslError::Session(e)) => {
            report_error(&output, &e);
            ExitCode::FAILURE
        }
        Err(e) => {
            output.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
