//! Date string assertions.
//!
//! Formats use the `time` crate's format description syntax, for example
//! `[year]-[month]-[day]` or `[day]/[month]/[year] [hour]:[minute]`.

use lion_test_core::{Result, TestError};
use time::format_description::BorrowedFormatItem;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Format used when a test does not name one.
pub const DEFAULT_DATE_FORMAT: &str = "[year]-[month]-[day]";

/// Asserts that `value` is a valid date in `format`.
///
/// The value must parse completely and format back to the identical text,
/// which rejects overflowing components such as `2024-02-30`.
///
/// # Errors
/// [`TestError::InvalidArgument`] if `format` is not a valid description,
/// [`TestError::Assertion`] if `value` is not a date in that format.
pub fn assert_is_date(value: &str, format: &str) -> Result<()> {
    let items = time::format_description::parse(format).map_err(|e| {
        TestError::invalid_argument(format!("invalid date format '{format}': {e}"))
    })?;

    match reformat(value, &items) {
        Some(formatted) if formatted == value => Ok(()),
        Some(formatted) => Err(TestError::assertion(format!(
            "'{value}' is not a valid date for format '{format}' (reads back as '{formatted}')"
        ))),
        None => Err(TestError::assertion(format!(
            "'{value}' is not a valid date for format '{format}'"
        ))),
    }
}

/// Parses `value` into the richest type the description supports and formats it back.
fn reformat(value: &str, items: &[BorrowedFormatItem<'_>]) -> Option<String> {
    if let Ok(parsed) = OffsetDateTime::parse(value, items) {
        return parsed.format(items).ok();
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(value, items) {
        return parsed.format(items).ok();
    }
    if let Ok(parsed) = Date::parse(value, items) {
        return parsed.format(items).ok();
    }
    Time::parse(value, items)
        .ok()
        .and_then(|parsed| parsed.format(items).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format() {
        assert_is_date("2024-05-17", DEFAULT_DATE_FORMAT).unwrap();
        assert_is_date("2024-02-29", DEFAULT_DATE_FORMAT).unwrap();
    }

    #[test]
    fn test_rejects_impossible_dates() {
        for value in ["2024-02-30", "2023-02-29", "2024-13-01", "2024-00-10"] {
            let err = assert_is_date(value, DEFAULT_DATE_FORMAT).unwrap_err();
            assert!(err.is_assertion(), "{value} should be rejected");
        }
    }

    #[test]
    fn test_rejects_partial_and_trailing_input() {
        assert!(assert_is_date("2024-05", DEFAULT_DATE_FORMAT).is_err());
        assert!(assert_is_date("2024-05-17 10:00", DEFAULT_DATE_FORMAT).is_err());
        assert!(assert_is_date("2024-5-7", DEFAULT_DATE_FORMAT).is_err());
        assert!(assert_is_date("not a date", DEFAULT_DATE_FORMAT).is_err());
    }

    #[test]
    fn test_custom_formats() {
        assert_is_date("17/05/2024", "[day]/[month]/[year]").unwrap();
        assert_is_date("2024-05-17 23:59:59", "[year]-[month]-[day] [hour]:[minute]:[second]")
            .unwrap();
        assert_is_date("08:30", "[hour]:[minute]").unwrap();
        assert!(
            assert_is_date("2024-05-17 24:00:00", "[year]-[month]-[day] [hour]:[minute]:[second]")
                .is_err()
        );
    }

    #[test]
    fn test_offset_format() {
        assert_is_date(
            "2024-05-17T10:00:00+02:00",
            "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]",
        )
        .unwrap();
    }

    #[test]
    fn test_invalid_format_description() {
        let err = assert_is_date("2024-05-17", "[year]-[month").unwrap_err();
        assert!(matches!(err, TestError::InvalidArgument(_)));
    }
}
