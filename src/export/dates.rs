//! Publication date normalization
//!
//! Platforms display dates as `2007. 4. 10. 11:32` or, for recent posts,
//! date only (`2026. 1. 19.`). Export needs `YYYY-MM-DD HH:MM:SS`.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Output format of normalized dates
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date-and-time formats, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y. %m. %d. %H:%M",
    "%Y.%m.%d. %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only formats, read as midnight
const DATE_FORMATS: &[&str] = &["%Y. %m. %d.", "%Y.%m.%d.", "%Y-%m-%d"];

/// Parses a platform date, collapsing runs of whitespace first
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&collapsed, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(&collapsed, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Normalizes a platform date to `YYYY-MM-DD HH:MM:SS`
///
/// An unparseable date never fails the export: the current local time is used
/// and a warning is logged.
pub fn normalize_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(parsed) => parsed.format(EXPORT_DATE_FORMAT).to_string(),
        None => {
            tracing::warn!("Could not parse date '{}', using current time", raw);
            Local::now().format(EXPORT_DATE_FORMAT).to_string()
        }
    }
}
