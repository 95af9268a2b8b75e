//! Mapping of raw CSV rows onto typed [`Record`]s.
//!
//! Column lookups are resolved once per table; every normalization rule
//! (blank shape/country, image flag, coordinate naming convention) is applied
//! here and nowhere else.

use crate::config::{AnalyticsSettings, ColumnMap};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::coordinates::{classify, PlaceholderLocation, RawCoordinates};
use crate::models::record::{
    non_blank, normalize_country, normalize_shape, parse_image_flag, Record,
};
use crate::models::time::{parse_occurred, parse_reported};

use super::csv_parser::{parse_rows, RawTable};

/// Column positions resolved against one table's header.
struct ResolvedColumns {
    occurred: Option<usize>,
    reported: Option<usize>,
    shape: Option<usize>,
    country: Option<usize>,
    state: Option<usize>,
    city: Option<usize>,
    latitude: Option<usize>,
    latitude_short: Option<usize>,
    longitude: Option<usize>,
    longitude_short: Option<usize>,
    has_image: Option<usize>,
    summary: Option<usize>,
    explanation: Option<usize>,
}

impl ResolvedColumns {
    fn resolve(table: &RawTable, columns: &ColumnMap) -> Self {
        let idx = |name: &str| table.column_index(name);
        Self {
            occurred: idx(&columns.occurred),
            reported: idx(&columns.reported),
            shape: idx(&columns.shape),
            country: idx(&columns.country),
            state: idx(&columns.state),
            city: idx(&columns.city),
            latitude: idx(&columns.latitude),
            latitude_short: idx(&columns.latitude_short),
            longitude: idx(&columns.longitude),
            longitude_short: idx(&columns.longitude_short),
            has_image: idx(&columns.has_image),
            summary: idx(&columns.summary),
            explanation: idx(&columns.explanation),
        }
    }
}

fn field(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

/// Preferred column if non-blank, else the alternate naming convention.
fn either(row: &[String], preferred: Option<usize>, alternate: Option<usize>) -> Option<String> {
    non_blank(field(row, preferred)).or_else(|| non_blank(field(row, alternate)))
}

/// Coordinate text of a raw row under either naming convention.
pub fn raw_coordinates(table: &RawTable, row: usize, columns: &ColumnMap) -> RawCoordinates {
    let fields = match table.rows().get(row) {
        Some(fields) => fields,
        None => return RawCoordinates::default(),
    };
    let lat = either(
        fields,
        table.column_index(&columns.latitude),
        table.column_index(&columns.latitude_short),
    );
    let lon = either(
        fields,
        table.column_index(&columns.longitude),
        table.column_index(&columns.longitude_short),
    );
    RawCoordinates::new(lat, lon)
}

/// Convert every row of `table` into a record.
pub fn records_from_table(
    table: &RawTable,
    columns: &ColumnMap,
    settings: &AnalyticsSettings,
) -> Vec<Record> {
    let cols = ResolvedColumns::resolve(table, columns);
    let placeholder =
        PlaceholderLocation::new(settings.placeholder_latitude, settings.placeholder_longitude);

    if cols.occurred.is_none() {
        log::warn!(
            "Occurrence column '{}' not found; time-based metrics will be empty",
            columns.occurred
        );
    }

    table
        .rows()
        .iter()
        .map(|row| {
            let coordinates = RawCoordinates::new(
                either(row, cols.latitude, cols.latitude_short),
                either(row, cols.longitude, cols.longitude_short),
            );
            let (quality, point) = classify(&coordinates, &placeholder);

            Record {
                occurred: parse_occurred(field(row, cols.occurred)),
                reported: parse_reported(field(row, cols.reported)),
                shape: normalize_shape(field(row, cols.shape)),
                country: normalize_country(field(row, cols.country)),
                state: non_blank(field(row, cols.state)),
                city: non_blank(field(row, cols.city)),
                coordinates,
                quality,
                point,
                has_image: parse_image_flag(field(row, cols.has_image)),
                summary: field(row, cols.summary).trim().to_string(),
                explanation: non_blank(field(row, cols.explanation)),
            }
        })
        .collect()
}

/// Records of `table`; a table without data rows is an error.
pub fn require_records(
    table: &RawTable,
    columns: &ColumnMap,
    settings: &AnalyticsSettings,
) -> AnalyticsResult<Vec<Record>> {
    let records = records_from_table(table, columns, settings);
    if records.is_empty() {
        return Err(AnalyticsError::empty_dataset(format!(
            "no data rows under {} header fields",
            table.headers().len()
        )));
    }
    Ok(records)
}

/// Parse delimited text straight into records.
pub fn parse_records(
    text: &str,
    columns: &ColumnMap,
    settings: &AnalyticsSettings,
) -> Vec<Record> {
    let table = parse_rows(text);
    records_from_table(&table, columns, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoordinateQuality;

    const HEADER: &str = "column-occurred,column-reported,column-shape,column-country,column-state,column-city,lat,lon,column-hasimage,column-summary";

    fn parse(body: &str) -> Vec<Record> {
        let text = format!("{}\n{}", HEADER, body);
        parse_records(&text, &ColumnMap::default(), &AnalyticsSettings::default())
    }

    #[test]
    fn test_full_row() {
        let records = parse("07/08/1947 10:00,07/09/1947,Disk,USA,NM,Roswell,33.39,-104.52,Yes,Debris found");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert!(r.occurred.is_some());
        assert!(r.reported.is_some());
        assert_eq!(r.shape, "Disk");
        assert_eq!(r.state.as_deref(), Some("NM"));
        assert_eq!(r.quality, CoordinateQuality::Valid);
        assert!(r.has_image);
        assert_eq!(r.summary, "Debris found");
    }

    #[test]
    fn test_blank_fields_normalized() {
        let records = parse(",,,,,,,,,");
        let r = &records[0];
        assert_eq!(r.shape, "Unknown");
        assert_eq!(r.country, "Unspecified");
        assert!(r.state.is_none());
        assert!(r.city.is_none());
        assert!(r.occurred.is_none());
        assert_eq!(r.quality, CoordinateQuality::Invalid);
        assert!(!r.has_image);
    }

    #[test]
    fn test_short_row_best_effort() {
        let records = parse("07/08/1947 10:00,,Light");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].shape, "Light");
        assert_eq!(records[0].country, "Unspecified");
    }

    #[test]
    fn test_long_coordinate_names_preferred() {
        let text = "column-shape,latitude,longitude,lat,lon\nDisk,10,20,30,40\nOrb,,,30,40";
        let records = parse_records(text, &ColumnMap::default(), &AnalyticsSettings::default());
        assert_eq!(records[0].position().unwrap().latitude, 10.0);
        assert_eq!(records[1].position().unwrap().latitude, 30.0);
    }

    #[test]
    fn test_placeholder_configurable() {
        let settings = AnalyticsSettings {
            placeholder_latitude: 1.0,
            placeholder_longitude: 2.0,
            ..Default::default()
        };
        let text = "lat,lon\n1,2\n37.0902,-95.7129";
        let records = parse_records(text, &ColumnMap::default(), &settings);
        assert_eq!(records[0].quality, CoordinateQuality::Placeholder);
        assert_eq!(records[1].quality, CoordinateQuality::Valid);
    }

    #[test]
    fn test_header_only_table_is_empty_dataset() {
        let table = parse_rows(&format!("{}\n", HEADER));
        let err = require_records(&table, &ColumnMap::default(), &AnalyticsSettings::default())
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptyDataset { .. }));
        assert!(err.to_string().contains("10 header fields"));

        let table = parse_rows(&format!("{}\n,,Orb", HEADER));
        let records =
            require_records(&table, &ColumnMap::default(), &AnalyticsSettings::default()).unwrap();
        assert_eq!(records[0].shape, "Orb");
    }

    #[test]
    fn test_raw_coordinates_helper() {
        let table = parse_rows("lat,lon\n5, \n");
        let raw = raw_coordinates(&table, 0, &ColumnMap::default());
        assert_eq!(raw.latitude.as_deref(), Some("5"));
        assert!(raw.longitude.is_none());
        assert!(!raw.has_pair());
    }
}
