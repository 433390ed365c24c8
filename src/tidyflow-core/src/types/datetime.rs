//! Calendar helpers shared by conversion and extraction operations.
//!
//! All datetimes are naive UTC values. Numbers convert to and from datetimes
//! as milliseconds since the Unix epoch.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats accepted for text without an explicit offset.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Build a datetime from milliseconds since the Unix epoch.
pub fn from_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Milliseconds since the Unix epoch.
pub fn to_millis(dt: &NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis()
}

/// Parse text as a datetime.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS[.fff]`,
/// and bare `YYYY-MM-DD` (midnight). Anything else yields `None`.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Canonical text form: RFC 3339 in UTC with millisecond precision.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
