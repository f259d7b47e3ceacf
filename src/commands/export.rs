//! Export command - email or download results

use super::prepare;
use crate::{
    NslslError,
    cli::ExportArgs,
    client::SearchBackend,
    config::NslslConfig,
    export::{ExportKind, is_valid_email},
    output::OutputWriter,
    selection::ItemId,
    session::{ExportSpec, SearchSession, SessionAction, SessionOutcome},
};
use dialoguer::{Input, theme::ColorfulTheme};
use std::io::IsTerminal;
use std::path::Path;

type Result<T> = std::result::Result<T, NslslError>;

/// Recipient from `--to`, or prompted for on a terminal
///
/// Returns `None` when no address was given and stdin is not interactive;
/// validation then reports the missing address.
///
/// # Errors
///
/// Returns `NslslError::Io` if the prompt cannot be read.
pub fn resolve_recipient(to: Option<String>) -> Result<Option<String>> {
    if to.is_some() || !std::io::stdin().is_terminal() {
        return Ok(to);
    }

    let address: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Email results to")
        .validate_with(|input: &String| {
            if is_valid_email(input) {
                Ok(())
            } else {
                Err("Enter a valid email address")
            }
        })
        .interact_text()
        .map_err(|e| NslslError::Io(std::io::Error::other(e)))?;
    Ok(Some(address))
}

/// Execute an export
///
/// Runs the search, moves to the requested page, ticks `--id` results and
/// sends the export.
///
/// # Errors
///
/// Returns an error if the search or export fails or the download cannot be
/// written.
pub fn execute<B: SearchBackend>(
    session: &mut SearchSession<B>,
    config: &NslslConfig,
    args: &ExportArgs,
    kind: ExportKind,
    recipient: Option<String>,
    dir: Option<&Path>,
    output: &dyn OutputWriter,
) -> Result<()> {
    prepare(session, config, &args.search)?;

    if let SessionOutcome::Redirect { url } = session.dispatch(SessionAction::Search)? {
        return Err(NslslError::InvalidInput(format!(
            "Search redirected to {url}; nothing to export"
        )));
    }
    if args.page > 1 {
        session.dispatch(SessionAction::FetchPage(args.page))?;
    }
    for id in &args.ids {
        session.dispatch(SessionAction::ToggleItem(ItemId::from(id.as_str())))?;
    }

    let spec = ExportSpec {
        kind,
        mode: args.mode,
        format: args.format,
        recipient: recipient.clone(),
    };

    match session.dispatch(SessionAction::Export(spec))? {
        SessionOutcome::EmailSent => {
            output.success(&format!(
                "Results emailed to {}",
                recipient.unwrap_or_default()
            ));
            Ok(())
        }
        SessionOutcome::Downloaded(file) => {
            let dir = dir.map_or_else(|| config.download_dir(), Path::to_path_buf);
            let path = file.write_to(&dir)?;
            output.success(&format!("Saved {}", path.display()));
            Ok(())
        }
        other => Err(NslslError::InvalidInput(format!(
            "Unexpected export outcome: {other:?}"
        ))),
    }
}
