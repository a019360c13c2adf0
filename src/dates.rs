//! Calendar helpers for capture timestamps.
//!
//! Timestamps are stored in UTC; anything calendar-shaped (day, month name)
//! is computed in the viewer's timezone.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

use crate::error::Error;

/// Parse an RFC 3339 timestamp.
///
/// # Errors
/// Returns [`Error::InvalidDate`] for anything that is not a valid timestamp.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidDate(raw.to_string()))
}

/// Format as `DD/MM/YYYY` in `tz`.
pub fn format_date(at: DateTime<Utc>, tz: Tz) -> String {
    let local = at.with_timezone(&tz);
    format!("{:02}/{:02}/{:04}", local.day(), local.month(), local.year())
}

/// Parse then format; fails loudly rather than producing a placeholder.
///
/// # Errors
/// Returns [`Error::InvalidDate`] if `raw` does not parse.
pub fn format_date_str(raw: &str, tz: Tz) -> Result<String, Error> {
    parse_timestamp(raw).map(|at| format_date(at, tz))
}

/// Month-name + four-digit year, e.g. `February 2024`.
pub fn month_key(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%B %Y").to_string()
}

/// Whether `at` falls in the same calendar month as `now`, both seen from `tz`.
pub fn same_month(at: DateTime<Utc>, now: DateTime<Utc>, tz: Tz) -> bool {
    let a = at.with_timezone(&tz);
    let b = now.with_timezone(&tz);
    a.year() == b.year() && a.month() == b.month()
}
