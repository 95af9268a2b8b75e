use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::coordinates::{CoordinateQuality, GeoPoint, RawCoordinates};

/// Shape used when the shape column is blank.
pub const UNKNOWN_SHAPE: &str = "Unknown";

/// Country used when the country column is blank.
pub const UNSPECIFIED_COUNTRY: &str = "Unspecified";

/// One parsed sighting. Normalized once at parse time and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub occurred: Option<NaiveDateTime>,
    pub reported: Option<NaiveDate>,
    pub shape: String,
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub coordinates: RawCoordinates,
    pub quality: CoordinateQuality,
    /// Parsed point, present only when `quality` is `Valid`
    pub point: Option<GeoPoint>,
    pub has_image: bool,
    pub summary: String,
    pub explanation: Option<String>,
}

impl Record {
    /// Position usable for plotting; `None` unless the coordinates are valid.
    pub fn position(&self) -> Option<GeoPoint> {
        if self.quality == CoordinateQuality::Valid {
            self.point
        } else {
            None
        }
    }

    pub fn occurred_date(&self) -> Option<NaiveDate> {
        self.occurred.map(|ts| ts.date())
    }

    /// Human-readable place, most specific part first.
    pub fn place(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if let Some(city) = &self.city {
            parts.push(city);
        }
        if let Some(state) = &self.state {
            parts.push(state);
        }
        parts.push(&self.country);
        parts.join(", ")
    }

    /// `(city, state, country)` with blank parts as empty strings.
    pub fn location_key(&self) -> (&str, &str, &str) {
        (
            self.city.as_deref().unwrap_or(""),
            self.state.as_deref().unwrap_or(""),
            &self.country,
        )
    }
}

/// Normalize the shape column: trimmed, blank becomes `"Unknown"`.
pub fn normalize_shape(value: &str) -> String {
    non_blank(value).unwrap_or_else(|| UNKNOWN_SHAPE.to_string())
}

/// Normalize the country column: trimmed, blank becomes `"Unspecified"`.
pub fn normalize_country(value: &str) -> String {
    non_blank(value).unwrap_or_else(|| UNSPECIFIED_COUNTRY.to_string())
}

/// Trimmed value, or `None` when blank.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Image flag from a leading "y"/"n" token ("Yes", "y", "N/A", ...).
pub fn parse_image_flag(value: &str) -> bool {
    value
        .trim()
        .chars()
        .next()
        .map(|c| c.eq_ignore_ascii_case(&'y'))
        .unwrap_or(false)
}
