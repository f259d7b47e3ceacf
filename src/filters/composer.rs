//! Default filter criteria composition
//!
//! The default filter panel sits beside the search box. Each ticked option
//! contributes one fragment and the fragments are joined with single spaces,
//! in selection order, without any operator. The server treats the
//! juxtaposition as a conjunction.
//!
//! ```text
//! year-within-last-n 5   BETWEEN (2021 : 3001 [Pub Year])
//! not-empty Abstract     NOTEMPTY ([Abstract])
//! contains Journal=Bone  CONTAINS (Bone[Journal])
//! custom range           BETWEEN (1990:2000[Pub Year])
//! ```

use super::error::FilterError;
use super::types::{FilterKind, FilterOption, YearRange};
use chrono::Datelike;
use tracing::debug;

/// Field holding the publication year
pub const PUB_YEAR_FIELD: &str = "Pub Year";

/// Upper bound of the "last N years" filters
pub const RECENT_YEARS_UPPER: u32 = 3001;

/// Start year used when the custom range omits `from`
pub const CUSTOM_RANGE_FLOOR: u32 = 1001;

/// End year used when the custom range omits `to`
pub const CUSTOM_RANGE_CEILING: u32 = 3000;

/// Compose the default filter criteria string
///
/// `current_year` anchors the "last N years" options.
///
/// # Errors
///
/// Returns `FilterError` if a "last N years" value is not a number, or the
/// active custom range has a bound that is not four digits or starts after it
/// ends.
pub fn compose(
    selected: &[FilterOption],
    custom_range: Option<&YearRange>,
    current_year: i32,
) -> Result<String, FilterError> {
    let mut fragments = selected
        .iter()
        .map(|option| render_option(option, current_year))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(range) = custom_range.filter(|r| r.is_active()) {
        let (from, to) = resolve_range(range)?;
        fragments.push(format!("BETWEEN ({from}:{to}[{PUB_YEAR_FIELD}])"));
    }

    let criteria = fragments.join(" ");
    debug!(filters = selected.len(), %criteria, "composed default filter criteria");
    Ok(criteria)
}

/// [`compose`] anchored at the current local year
///
/// # Errors
///
/// See [`compose`].
pub fn compose_now(
    selected: &[FilterOption],
    custom_range: Option<&YearRange>,
) -> Result<String, FilterError> {
    compose(selected, custom_range, chrono::Local::now().year())
}

fn render_option(option: &FilterOption, current_year: i32) -> Result<String, FilterError> {
    match option.kind {
        FilterKind::YearWithinLastN => {
            let years: i32 = option
                .value
                .trim()
                .parse()
                .map_err(|_| FilterError::InvalidValue {
                    name: option.name.clone(),
                    value: option.value.clone(),
                })?;
            let start = current_year - years;
            Ok(format!(
                "BETWEEN ({start} : {RECENT_YEARS_UPPER} [{PUB_YEAR_FIELD}])"
            ))
        }
        FilterKind::NotEmpty => Ok(format!("NOTEMPTY ([{}])", option.value)),
        FilterKind::Contains => Ok(format!("CONTAINS ({}[{}])", option.value, option.field)),
    }
}

/// Validate the custom range and fill in missing bounds
fn resolve_range(range: &YearRange) -> Result<(u32, u32), FilterError> {
    for bound in [range.from, range.to].into_iter().flatten() {
        if digit_count(bound) != 4 {
            return Err(FilterError::InvalidYear(bound));
        }
    }

    let from = range.from.unwrap_or(CUSTOM_RANGE_FLOOR);
    let to = range.to.unwrap_or(CUSTOM_RANGE_CEILING);
    if from > to {
        return Err(FilterError::InvertedRange { from, to });
    }
    Ok((from, to))
}

fn digit_count(value: u32) -> u32 {
    value.checked_ilog10().map_or(1, |log| log + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_years(n: u32) -> FilterOption {
        FilterOption::new(
            format!("last-{n}-years"),
            FilterKind::YearWithinLastN,
            PUB_YEAR_FIELD,
            n.to_string(),
        )
    }

    #[test]
    fn test_year_within_last_n() {
        let criteria = compose(&[last_years(5)], None, 2026).unwrap();
        assert_eq!(criteria, "BETWEEN (2021 : 3001 [Pub Year])");
    }

    #[test]
    fn test_not_empty_and_contains() {
        let selected = [
            FilterOption::new("has-abstract", FilterKind::NotEmpty, "", "Abstract"),
            FilterOption::new("bone", FilterKind::Contains, "Journal", "Bone"),
        ];
        let criteria = compose(&selected, None, 2026).unwrap();
        assert_eq!(criteria, "NOTEMPTY ([Abstract]) CONTAINS (Bone[Journal])");
    }

    #[test]
    fn test_nothing_selected_is_empty() {
        assert_eq!(compose(&[], None, 2026).unwrap(), "");
        let disabled = YearRange {
            enabled: false,
            from: Some(1999),
            to: Some(1998),
        };
        assert_eq!(compose(&[], Some(&disabled), 2026).unwrap(), "");
    }

    #[test]
    fn test_custom_range_appended_last() {
        let range = YearRange::new(Some(1990), Some(2000));
        let criteria = compose(&[last_years(10)], Some(&range), 2026).unwrap();
        assert_eq!(
            criteria,
            "BETWEEN (2016 : 3001 [Pub Year]) BETWEEN (1990:2000[Pub Year])"
        );
    }

    #[test]
    fn test_custom_range_defaults() {
        let range = YearRange::new(None, None);
        assert_eq!(
            compose(&[], Some(&range), 2026).unwrap(),
            "BETWEEN (1001:3000[Pub Year])"
        );

        let range = YearRange::new(Some(1965), None);
        assert_eq!(
            compose(&[], Some(&range), 2026).unwrap(),
            "BETWEEN (1965:3000[Pub Year])"
        );
    }

    #[test]
    fn test_inverted_range_fails() {
        let range = YearRange::new(Some(1999), Some(1998));
        let err = compose(&[], Some(&range), 2026).unwrap_err();
        assert_eq!(err, FilterError::InvertedRange { from: 1999, to: 1998 });
    }

    #[test]
    fn test_range_bound_digit_count() {
        let range = YearRange::new(Some(999), None);
        assert_eq!(
            compose(&[], Some(&range), 2026).unwrap_err(),
            FilterError::InvalidYear(999)
        );

        let range = YearRange::new(None, Some(20_000));
        assert_eq!(
            compose(&[], Some(&range), 2026).unwrap_err(),
            FilterError::InvalidYear(20_000)
        );
    }

    #[test]
    fn test_missing_from_can_invert() {
        let range = YearRange::new(None, Some(1000));
        assert_eq!(
            compose(&[], Some(&range), 2026).unwrap_err(),
            FilterError::InvertedRange { from: 1001, to: 1000 }
        );
    }

    #[test]
    fn test_invalid_year_count_value() {
        let option = FilterOption::new("odd", FilterKind::YearWithinLastN, "", "five");
        assert!(matches!(
            compose(&[option], None, 2026),
            Err(FilterError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(1000), 4);
        assert_eq!(digit_count(9999), 4);
        assert_eq!(digit_count(10_000), 5);
    }
}
