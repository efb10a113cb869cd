//! Creation timestamp parsing.
//!
//! The backend hands timestamps back as text, usually RFC 3339 but
//! occasionally in Postgres' own `YYYY-MM-DD HH:MM:SS+HH` form, and older
//! rows may carry a bare date or a zone-less date-time. Interpretation
//! follows what a browser would do with the same string: zone-less
//! date-times are local to the observer, bare dates are UTC midnight.

use chrono::{DateTime, Datelike as _, NaiveDate, NaiveDateTime, TimeZone};

/// Formats that carry an explicit offset, tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Zone-less formats, interpreted in the observer's zone.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a raw timestamp and converts it into `tz`.
///
/// Returns `None` if the text matches none of the accepted forms, or names
/// a local time that does not exist in `tz` (e.g. inside a DST gap).
/// Ambiguous local times resolve to the earlier instant.
#[must_use]
pub fn parse_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(tz));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().with_timezone(tz))
}

/// Returns the zero-based calendar month (0 = January) of `raw` as seen
/// from `tz`.
#[must_use]
pub fn month_index<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<usize> {
    parse_in(raw, tz).and_then(|dt| usize::try_from(dt.month0()).ok())
}
