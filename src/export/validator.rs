//! Pre-dispatch validation of export requests

use super::error::ExportError;
use super::types::{ExportFormat, ExportKind, ExportRequest, SelectionMode};
use crate::selection::ItemId;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Most results that may be emailed in "all" mode
pub const EMAIL_RESULT_CEILING: u64 = 1_000;

/// Most results that may be downloaded in "all" mode
pub const SAVE_RESULT_CEILING: u64 = 10_000;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$",
    )
    .expect("email pattern compiles")
});

/// Result ceiling for "all" mode exports of `kind`
#[must_use]
pub const fn result_ceiling(kind: ExportKind) -> u64 {
    match kind {
        ExportKind::Email => EMAIL_RESULT_CEILING,
        ExportKind::Save => SAVE_RESULT_CEILING,
    }
}

/// Whether `address` looks like a deliverable email address
#[must_use]
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_PATTERN.is_match(address.trim())
}

/// Validate an export before anything is sent
///
/// `reported_total` is the result count the server reported for the
/// current query.
///
/// # Errors
///
/// - `ExportError::EmptySelection` for "selected" mode without ids
/// - `ExportError::TooManyResults` for "all" mode above the kind's ceiling
/// - `ExportError::MissingEmail` / `ExportError::InvalidEmail` for email
///   exports without a well-formed recipient
pub fn validate(
    mode: SelectionMode,
    format: ExportFormat,
    selected_ids: &[ItemId],
    reported_total: u64,
    kind: ExportKind,
    recipient: Option<&str>,
) -> Result<ExportRequest, ExportError> {
    match mode {
        SelectionMode::Selected if selected_ids.is_empty() => {
            return Err(ExportError::EmptySelection);
        }
        SelectionMode::All if reported_total > result_ceiling(kind) => {
            return Err(ExportError::TooManyResults {
                kind,
                count: reported_total,
                ceiling: result_ceiling(kind),
            });
        }
        _ => {}
    }

    let recipient_email = match kind {
        ExportKind::Email => {
            let address = recipient
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .ok_or(ExportError::MissingEmail)?;
            if !is_valid_email(address) {
                return Err(ExportError::InvalidEmail(address.to_string()));
            }
            Some(address.to_string())
        }
        ExportKind::Save => None,
    };

    debug!(%kind, ?mode, ?format, ids = selected_ids.len(), "export validated");

    Ok(ExportRequest {
        kind,
        selection_mode: mode,
        format,
        recipient_email,
        selected_ids: selected_ids.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: Option<&str> = Some("reader@example.org");

    #[test]
    fn test_email_all_over_ceiling() {
        let err = validate(
            SelectionMode::All,
            ExportFormat::Csv,
            &[],
            1500,
            ExportKind::Email,
            ADDRESS,
        )
        .unwrap_err();
        assert!(err.is_oversized());
        assert!(matches!(
            err,
            ExportError::TooManyResults { count: 1500, ceiling: 1000, .. }
        ));
    }

    #[test]
    fn test_email_all_under_ceiling() {
        let request = validate(
            SelectionMode::All,
            ExportFormat::Csv,
            &[],
            900,
            ExportKind::Email,
            ADDRESS,
        )
        .unwrap();
        assert_eq!(request.recipient_email.as_deref(), ADDRESS);
        assert_eq!(request.selection_mode, SelectionMode::All);
    }

    #[test]
    fn test_email_ceiling_is_inclusive() {
        assert!(
            validate(SelectionMode::All, ExportFormat::Summary, &[], 1000, ExportKind::Email, ADDRESS)
                .is_ok()
        );
    }

    #[test]
    fn test_save_ceiling() {
        assert!(
            validate(SelectionMode::All, ExportFormat::AllFields, &[], 1500, ExportKind::Save, None)
                .is_ok()
        );
        assert!(
            validate(SelectionMode::All, ExportFormat::AllFields, &[], 10_001, ExportKind::Save, None)
                .unwrap_err()
                .is_oversized()
        );
    }

    #[test]
    fn test_selected_requires_ids() {
        let err = validate(
            SelectionMode::Selected,
            ExportFormat::Csv,
            &[],
            5,
            ExportKind::Save,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::EmptySelection));
        assert!(err.is_validation());

        let ids = [ItemId::from("42")];
        let request = validate(
            SelectionMode::Selected,
            ExportFormat::Csv,
            &ids,
            5,
            ExportKind::Save,
            None,
        )
        .unwrap();
        assert_eq!(request.selected_ids, ids);
        assert!(request.recipient_email.is_none());
    }

    #[test]
    fn test_selected_ignores_ceiling() {
        let ids = [ItemId::from("1")];
        assert!(
            validate(SelectionMode::Selected, ExportFormat::Csv, &ids, 50_000, ExportKind::Email, ADDRESS)
                .is_ok()
        );
    }

    #[test]
    fn test_email_address_required_and_checked() {
        let missing = validate(
            SelectionMode::AllOnPage,
            ExportFormat::Csv,
            &[],
            10,
            ExportKind::Email,
            Some("  "),
        );
        assert!(matches!(missing, Err(ExportError::MissingEmail)));

        let malformed = validate(
            SelectionMode::AllOnPage,
            ExportFormat::Csv,
            &[],
            10,
            ExportKind::Email,
            Some("not-an-address"),
        );
        assert!(matches!(malformed, Err(ExportError::InvalidEmail(_))));
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("first.last@nasa.gov"));
        assert!(is_valid_email("a+tag@sub.example.co.uk"));
        assert!(!is_valid_email("missing-at.example.org"));
        assert!(!is_valid_email("two@@example.org"));
        assert!(!is_valid_email("trailing@example."));
        assert!(!is_valid_email("spaces in@example.org"));
    }
}
