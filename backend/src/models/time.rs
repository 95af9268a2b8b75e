//! Timestamp parsing for the dataset's locale-formatted date columns.
//!
//! All timestamps are naive and treated as UTC; no time zone conversion is done.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Date-time layouts accepted for the occurrence column, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Date-only layouts. `%m/%d/%y` is only accepted for report dates.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Weekday labels, Sunday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Parse an occurrence timestamp. Date-only values resolve to midnight.
pub fn parse_occurred(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a report date. A full timestamp is accepted and truncated to its date.
pub fn parse_reported(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| NaiveDate::parse_from_str(value, "%m/%d/%y").ok())
        .or_else(|| parse_occurred(value).map(|dt| dt.date()))
}

/// Whole days between occurrence and report, clamped at zero.
///
/// The occurrence time is truncated to its calendar date, so a report filed the
/// day after a 10:00 sighting counts as one day.
pub fn report_delay_days(occurred: NaiveDateTime, reported: NaiveDate) -> i64 {
    (reported - occurred.date()).num_days().max(0)
}

/// Decade of a year: `floor(year / 10) * 10`.
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Zero-based month index (January = 0).
pub fn month_index(ts: &NaiveDateTime) -> usize {
    ts.month0() as usize
}

/// Weekday index with Sunday = 0.
pub fn weekday_index(ts: &NaiveDateTime) -> usize {
    ts.weekday().num_days_from_sunday() as usize
}

/// Hour of day, 0..24.
pub fn hour_index(ts: &NaiveDateTime) -> usize {
    ts.hour() as usize
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
