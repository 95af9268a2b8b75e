//! Coordinate quality classification.

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_northern(&self) -> bool {
        self.latitude >= 0.0
    }
}

/// Coordinate text as found in the dataset, before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCoordinates {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl RawCoordinates {
    pub fn new(latitude: Option<String>, longitude: Option<String>) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components present (not necessarily parseable).
    pub fn has_pair(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// The sentinel pair used by the dataset for "country known, location unknown".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl PlaceholderLocation {
    const TOLERANCE: f64 = 1e-6;

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn matches(&self, latitude: f64, longitude: f64) -> bool {
        (latitude - self.latitude).abs() < Self::TOLERANCE
            && (longitude - self.longitude).abs() < Self::TOLERANCE
    }
}

impl Default for PlaceholderLocation {
    fn default() -> Self {
        Self::new(37.0902, -95.7129)
    }
}

/// Quality bucket of a record's coordinate pair. Every record falls in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateQuality {
    Invalid,
    Zero,
    Placeholder,
    Valid,
}

impl CoordinateQuality {
    pub fn label(&self) -> &'static str {
        match self {
            CoordinateQuality::Invalid => "Invalid",
            CoordinateQuality::Zero => "Zero",
            CoordinateQuality::Placeholder => "Placeholder",
            CoordinateQuality::Valid => "Valid",
        }
    }
}

/// Parse one coordinate component. Non-finite values are rejected.
fn parse_component(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Classify a coordinate pair.
///
/// Buckets are evaluated in priority order: invalid (unparsable or out of
/// range), zero, placeholder, valid. Returns the parsed point for valid pairs.
pub fn classify(
    raw: &RawCoordinates,
    placeholder: &PlaceholderLocation,
) -> (CoordinateQuality, Option<GeoPoint>) {
    let (lat, lon) = match (
        parse_component(raw.latitude.as_deref()),
        parse_component(raw.longitude.as_deref()),
    ) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return (CoordinateQuality::Invalid, None),
    };

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return (CoordinateQuality::Invalid, None);
    }
    if lat == 0.0 && lon == 0.0 {
        return (CoordinateQuality::Zero, None);
    }
    if placeholder.matches(lat, lon) {
        return (CoordinateQuality::Placeholder, None);
    }

    (CoordinateQuality::Valid, Some(GeoPoint::new(lat, lon)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(lat: &str, lon: &str) -> RawCoordinates {
        RawCoordinates::new(Some(lat.to_string()), Some(lon.to_string()))
    }

    fn quality(lat: &str, lon: &str) -> CoordinateQuality {
        classify(&raw(lat, lon), &PlaceholderLocation::default()).0
    }

    #[test]
    fn test_placeholder_pair() {
        assert_eq!(quality("37.0902", "-95.7129"), CoordinateQuality::Placeholder);
    }

    #[test]
    fn test_zero_pair() {
        assert_eq!(quality("0", "0"), CoordinateQuality::Zero);
        assert_eq!(quality("0.0", "-0.0"), CoordinateQuality::Zero);
    }

    #[test]
    fn test_zero_latitude_alone_is_valid() {
        assert_eq!(quality("0", "10.5"), CoordinateQuality::Valid);
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        assert_eq!(quality("91", "10"), CoordinateQuality::Invalid);
        assert_eq!(quality("45", "-180.5"), CoordinateQuality::Invalid);
    }

    #[test]
    fn test_unparsable_or_missing_is_invalid() {
        assert_eq!(quality("abc", "10"), CoordinateQuality::Invalid);
        assert_eq!(quality("NaN", "10"), CoordinateQuality::Invalid);
        assert_eq!(quality("", "10"), CoordinateQuality::Invalid);
        let missing = RawCoordinates::new(Some("10".to_string()), None);
        assert_eq!(
            classify(&missing, &PlaceholderLocation::default()).0,
            CoordinateQuality::Invalid
        );
    }

    #[test]
    fn test_valid_pair_returns_point() {
        let (q, point) = classify(&raw(" 51.5 ", "-0.12"), &PlaceholderLocation::default());
        assert_eq!(q, CoordinateQuality::Valid);
        let point = point.unwrap();
        assert_eq!(point.latitude, 51.5);
        assert!(point.is_northern());
    }

    #[test]
    fn test_boundaries_are_valid() {
        assert_eq!(quality("-90", "180"), CoordinateQuality::Valid);
        assert_eq!(quality("90", "-180"), CoordinateQuality::Valid);
    }
}
