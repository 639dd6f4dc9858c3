//! Time utility functions

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value as JsonValue;

/// Parse a record or condition value into a timestamp.
///
/// Accepts:
/// - RFC 3339 strings (`2024-01-15T10:30:00Z`, `2024-01-15T10:30:00+04:00`)
/// - Naive date-times (`2024-01-15T10:30:00`, `2024-01-15 10:30:00`), read as local time
/// - Calendar dates (`2024-01-15`), read as local midnight
/// - Numbers, read as milliseconds since the Unix epoch
pub fn parse_timestamp(value: &JsonValue) -> Option<DateTime<Utc>> {
    match value {
        JsonValue::String(s) => parse_timestamp_str(s),
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_str(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if ts.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(ts, format) {
            return local_to_utc(naive);
        }
    }

    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(local_to_utc)
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    // DST gaps have no local representation; take the earliest valid instant
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Calendar date of a timestamp in the local timezone (time of day dropped)
pub fn local_date(dt: DateTime<Utc>) -> NaiveDate {
    dt.with_timezone(&Local).date_naive()
}
