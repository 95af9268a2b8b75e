//! Coordinate coverage reporting and location fills for dataset maintenance.
//!
//! These operate on the raw table (not on parsed records) where they need to
//! see which coordinate text is present, so a filled table can be written back
//! out with its original columns intact.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::config::ColumnMap;
use crate::models::{CoordinateQuality, Record};
use crate::parsing::csv_parser::RawTable;
use crate::parsing::records::raw_coordinates;
use crate::services::aggregate::LabelCount;
use crate::services::categorical::top_n;
use crate::services::geo::{tally, CoordinateTally};

/// Header of the missing-location CSV, in column order.
pub const MISSING_KEYS_HEADER: [&str; 6] = [
    "column-city",
    "column-state",
    "column-country",
    "count",
    "lat",
    "lon",
];

/// `(city, state, country)` triple; blank parts are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationKey {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl LocationKey {
    pub fn new(city: &str, state: &str, country: &str) -> Self {
        Self {
            city: city.trim().to_string(),
            state: state.trim().to_string(),
            country: country.trim().to_string(),
        }
    }

    fn from_row(table: &RawTable, row: usize, columns: &ColumnMap) -> Self {
        let get = |name: &str| table.get(row, name).unwrap_or("");
        Self::new(get(&columns.city), get(&columns.state), get(&columns.country))
    }

    fn from_record(record: &Record) -> Self {
        let (city, state, country) = record.location_key();
        Self::new(city, state, country)
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.city, self.state, self.country)
    }
}

/// A location key and how many rows carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCount {
    pub key: LocationKey,
    pub count: u64,
}

/// Summary of coordinate coverage over parsed records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub totals: CoordinateTally,
    pub top_shapes: Vec<LabelCount>,
    pub top_countries: Vec<LabelCount>,
    /// First rows whose coordinates were missing or invalid
    pub missing_samples: Vec<LocationKey>,
}

/// Presence of coordinate text in the raw table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodePresence {
    pub total: u64,
    pub both: u64,
    pub lat_only: u64,
    pub lon_only: u64,
    pub none: u64,
    /// Most common keys among rows lacking a coordinate pair
    pub top_missing: Vec<KeyCount>,
}

pub fn coverage_report(records: &[Record], top: usize, sample_limit: usize) -> CoverageReport {
    CoverageReport {
        totals: tally(records),
        top_shapes: top_n(records.iter().map(|r| r.shape.as_str()), top),
        top_countries: top_n(records.iter().map(|r| r.country.as_str()), top),
        missing_samples: records
            .iter()
            .filter(|r| r.quality == CoordinateQuality::Invalid)
            .take(sample_limit)
            .map(LocationKey::from_record)
            .collect(),
    }
}

pub fn geocode_presence(table: &RawTable, columns: &ColumnMap, top: usize) -> GeocodePresence {
    let mut presence = GeocodePresence::default();

    for row in 0..table.len() {
        let raw = raw_coordinates(table, row, columns);
        presence.total += 1;
        match (raw.latitude.is_some(), raw.longitude.is_some()) {
            (true, true) => presence.both += 1,
            (true, false) => presence.lat_only += 1,
            (false, true) => presence.lon_only += 1,
            (false, false) => presence.none += 1,
        }
    }

    let mut missing = missing_location_keys(table, columns);
    missing.truncate(top);
    presence.top_missing = missing;
    presence
}

/// Unique keys of rows lacking a coordinate pair, most common first.
///
/// Equal counts keep the order in which keys were first seen.
pub fn missing_location_keys(table: &RawTable, columns: &ColumnMap) -> Vec<KeyCount> {
    let mut index: HashMap<LocationKey, usize> = HashMap::new();
    let mut keys: Vec<KeyCount> = Vec::new();

    for row in 0..table.len() {
        if raw_coordinates(table, row, columns).has_pair() {
            continue;
        }
        let key = LocationKey::from_row(table, row, columns);
        match index.get(&key) {
            Some(&i) => keys[i].count += 1,
            None => {
                index.insert(key.clone(), keys.len());
                keys.push(KeyCount { key, count: 1 });
            }
        }
    }

    keys.sort_by(|a, b| b.count.cmp(&a.count));
    keys
}

/// Missing keys as a fill template, lat/lon left blank.
pub fn missing_keys_table(keys: &[KeyCount]) -> RawTable {
    let mut table = RawTable::new(MISSING_KEYS_HEADER.iter().map(|h| h.to_string()).collect());
    for entry in keys {
        table.push_row(vec![
            entry.key.city.clone(),
            entry.key.state.clone(),
            entry.key.country.clone(),
            entry.count.to_string(),
            String::new(),
            String::new(),
        ]);
    }
    table
}

/// Read a fill table in the [`MISSING_KEYS_HEADER`] layout.
///
/// Only entries with both a latitude and a longitude are kept.
pub fn location_fills(fills: &RawTable) -> HashMap<LocationKey, (String, String)> {
    let mut map = HashMap::new();
    for row in 0..fills.len() {
        let get = |name: &str| fills.get(row, name).unwrap_or("").trim();
        let (lat, lon) = (get("lat"), get("lon"));
        if lat.is_empty() || lon.is_empty() {
            continue;
        }
        let key = LocationKey::new(get("column-city"), get("column-state"), get("column-country"));
        map.insert(key, (lat.to_string(), lon.to_string()));
    }
    map
}

/// Copy coordinates from `fills` into rows that lack a pair.
///
/// Values are written to the short `lat`/`lon` columns (created if absent).
/// Rows that already have both values are never touched. Returns the number
/// of rows updated.
pub fn apply_location_fills(
    table: &mut RawTable,
    fills: &HashMap<LocationKey, (String, String)>,
    columns: &ColumnMap,
) -> usize {
    let mut applied = 0;
    for row in 0..table.len() {
        if raw_coordinates(table, row, columns).has_pair() {
            continue;
        }
        let key = LocationKey::from_row(table, row, columns);
        if let Some((lat, lon)) = fills.get(&key) {
            table.set(row, &columns.latitude_short, lat.clone());
            table.set(row, &columns.longitude_short, lon.clone());
            applied += 1;
        }
    }
    log::info!("Applied location fills to {} rows", applied);
    applied
}
