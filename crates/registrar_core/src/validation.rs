//! Input syntax checks shared by the console and the service layer.
//!
//! All helpers are pure: they never log, never touch storage and never panic.
//! Failures are reported as `false`/`None` so callers can re-prompt.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Input and output format for dates of birth.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});
static DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// Returns true when `value` is a base-10 32-bit integer with nothing around it.
pub fn is_valid_integer(value: &str) -> bool {
    value.parse::<i32>().is_ok()
}

/// Returns true when `value` contains at least one non-whitespace character.
pub fn is_valid_string(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Returns true when `value` is exactly ten ASCII digits.
pub fn is_valid_phone(value: &str) -> bool {
    value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true when `value` looks like `local@domain.tld`.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Parses a `yyyy-MM-dd` calendar date.
///
/// Returns `None` for malformed input and for dates that do not exist
/// (e.g. `2023-02-29`).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_SHAPE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Parses a non-negative age.
pub fn parse_age(value: &str) -> Option<u32> {
    value.parse::<i32>().ok().and_then(|age| u32::try_from(age).ok())
}

/// Parses a record selector as a numeric id when it is a valid integer.
///
/// Non-numeric selectors are treated as names by callers.
pub fn parse_id(value: &str) -> Option<i64> {
    value.parse::<i32>().ok().map(i64::from)
}

/// Formats a date the same way [`parse_date`] expects it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
