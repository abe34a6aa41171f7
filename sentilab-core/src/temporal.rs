//! Temporal resolver — heterogeneous date strings to epoch milliseconds and back.
//!
//! Sources mix bare calendar days (`2024-03-01`), RFC 3339 timestamps and the
//! pandas form `2024-03-01 00:00:00-05:00`. A general parse is attempted first;
//! if it fails the string is retried with an explicit `T00:00:00Z` suffix so
//! bare days always resolve to UTC midnight.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::coerce::format_date_label;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Resolve a date string to epoch milliseconds, or `None` if it cannot be parsed.
pub fn resolve_time(date: Option<&str>) -> Option<i64> {
    let trimmed = date?.trim();
    if trimmed.is_empty() {
        return None;
    }

    parse_general(trimmed)
        .or_else(|| parse_general(&format!("{trimmed}T00:00:00Z")))
        .map(|dt| dt.timestamp_millis())
}

fn parse_general(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Render epoch milliseconds as an `MM/DD` axis label; non-finite input yields `""`.
pub fn format_time_as_date(epoch_ms: f64) -> String {
    if !epoch_ms.is_finite() {
        return String::new();
    }
    match DateTime::from_timestamp_millis(epoch_ms as i64) {
        Some(dt) => format_date_label(&dt.format("%Y-%m-%d").to_string()),
        None => String::new(),
    }
}
