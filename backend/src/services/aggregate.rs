//! Metrics aggregation over the filtered record set.
//!
//! [`aggregate`] is pure: it reads the records and the filter and returns a
//! fresh [`AggregateBundle`]. The filter predicate is evaluated exactly once
//! per record, before any counting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::AnalyticsSettings;
use crate::models::Record;
use crate::services::filter::FilterState;
use crate::services::{categorical, delay, geo, temporal};

pub use crate::services::delay::LabelAverage;
pub use crate::services::geo::{CoordinateTally, Hemispheres, SamplePoint};

/// A labelled count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub value: u64,
}

impl LabelCount {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Dense 2-D count matrix, `cells[row][column]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cells: Vec<Vec<u64>>,
}

impl Matrix {
    pub fn zeros(row_labels: Vec<String>, column_labels: Vec<String>) -> Self {
        let cells = vec![vec![0; column_labels.len()]; row_labels.len()];
        Self {
            row_labels,
            column_labels,
            cells,
        }
    }

    pub fn increment(&mut self, row: usize, column: usize) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell += 1;
        }
    }

    pub fn get(&self, row: usize, column: usize) -> u64 {
        self.cells
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .unwrap_or(0)
    }

    pub fn max(&self) -> u64 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.column_labels.is_empty()
    }
}

/// Inclusive range of occurrence dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Every metric for one filter state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateBundle {
    pub total_records: usize,
    pub filtered_records: usize,
    pub date_span: Option<DateSpan>,
    pub top_shapes: Vec<LabelCount>,
    pub top_countries: Vec<LabelCount>,
    pub top_cities: Vec<LabelCount>,
    pub top_states: Vec<LabelCount>,
    pub by_year: Vec<LabelCount>,
    pub by_month: Vec<LabelCount>,
    pub by_weekday: Vec<LabelCount>,
    pub by_hour: Vec<LabelCount>,
    pub by_decade: Vec<LabelCount>,
    pub delay_buckets: Vec<LabelCount>,
    pub avg_delay_by_country: Vec<LabelAverage>,
    pub avg_delay_by_year: Vec<LabelAverage>,
    pub month_hour: Matrix,
    pub shape_by_decade: Matrix,
    pub cumulative_by_year: Vec<LabelCount>,
    pub hemispheres: Hemispheres,
    pub coordinate_quality: CoordinateTally,
    pub coordinate_quality_by_country: BTreeMap<String, CoordinateTally>,
    pub image_split: Vec<LabelCount>,
    pub scatter_sample: Vec<SamplePoint>,
}

/// Compute every metric over the records passing `filter`.
pub fn aggregate(
    records: &[Record],
    filter: &FilterState,
    settings: &AnalyticsSettings,
) -> AggregateBundle {
    let selected: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r))
        .map(|(i, _)| i)
        .collect();
    let filtered: Vec<&Record> = selected.iter().map(|&i| &records[i]).collect();

    let n = settings.top_n;
    let by_year = temporal::by_year(&filtered);
    let cumulative_by_year = temporal::cumulative(&by_year);

    log::debug!(
        "Aggregating {} of {} records",
        filtered.len(),
        records.len()
    );

    AggregateBundle {
        total_records: records.len(),
        filtered_records: filtered.len(),
        date_span: temporal::date_span(&filtered),
        top_shapes: categorical::top_shapes(&filtered, n),
        top_countries: categorical::top_countries(&filtered, n),
        top_cities: categorical::top_cities(&filtered, n),
        top_states: categorical::top_states(&filtered, &settings.domestic_country, n),
        by_year,
        by_month: temporal::by_month(&filtered),
        by_weekday: temporal::by_weekday(&filtered),
        by_hour: temporal::by_hour(&filtered),
        by_decade: temporal::by_decade(&filtered),
        delay_buckets: delay::delay_buckets(&filtered),
        avg_delay_by_country: delay::avg_delay_by_country(&filtered, n),
        avg_delay_by_year: delay::avg_delay_by_year(&filtered),
        month_hour: temporal::month_hour(&filtered),
        shape_by_decade: temporal::shape_by_decade(&filtered, settings.shape_decade_shapes),
        cumulative_by_year,
        hemispheres: geo::hemispheres(&filtered),
        coordinate_quality: geo::tally(filtered.iter().copied()),
        coordinate_quality_by_country: geo::tally_by_country(&filtered),
        image_split: categorical::image_split(&filtered),
        scatter_sample: geo::scatter_sample(
            selected.iter().map(|&i| (i, &records[i])),
            settings.sample_size,
        ),
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod aggregate_tests;
