//! Report delay: days between a sighting and its report.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::time::report_delay_days;
use crate::models::Record;
use crate::services::aggregate::LabelCount;

/// Inclusive upper bounds of the delay bins; the last bin is open-ended.
const BUCKET_BOUNDS: [i64; 7] = [0, 3, 7, 14, 30, 90, 365];

pub const BUCKET_LABELS: [&str; 8] = [
    "0", "1-3", "4-7", "8-14", "15-30", "31-90", "91-365", "366+",
];

/// Average delay for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAverage {
    pub label: String,
    pub average: f64,
    pub samples: u64,
}

#[derive(Default)]
struct Accumulator {
    sum: i64,
    count: u64,
}

impl Accumulator {
    fn add(&mut self, days: i64) {
        self.sum += days;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }
}

/// Delay in days for a record with both timestamps.
pub fn record_delay(record: &Record) -> Option<i64> {
    match (record.occurred, record.reported) {
        (Some(occurred), Some(reported)) => Some(report_delay_days(occurred, reported)),
        _ => None,
    }
}

/// Index of the bin a (non-negative) delay falls into.
pub fn bucket_index(days: i64) -> usize {
    BUCKET_BOUNDS
        .iter()
        .position(|bound| days <= *bound)
        .unwrap_or(BUCKET_BOUNDS.len())
}

/// Counts per delay bin, always 8 entries.
pub fn delay_buckets(records: &[&Record]) -> Vec<LabelCount> {
    let mut counts = [0u64; 8];
    for days in records.iter().filter_map(|r| record_delay(r)) {
        counts[bucket_index(days)] += 1;
    }
    BUCKET_LABELS
        .iter()
        .zip(counts)
        .map(|(label, count)| LabelCount::new(*label, count))
        .collect()
}

/// Average delay per country, most samples first, truncated to `n`.
pub fn avg_delay_by_country(records: &[&Record], n: usize) -> Vec<LabelAverage> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Accumulator> = HashMap::new();

    for record in records {
        if let Some(days) = record_delay(record) {
            let country = record.country.as_str();
            groups
                .entry(country)
                .or_insert_with(|| {
                    order.push(country);
                    Accumulator::default()
                })
                .add(days);
        }
    }

    let mut averages: Vec<LabelAverage> = order
        .into_iter()
        .filter_map(|country| {
            groups.get(country).map(|acc| LabelAverage {
                label: country.to_string(),
                average: acc.average(),
                samples: acc.count,
            })
        })
        .collect();
    averages.sort_by(|a, b| b.samples.cmp(&a.samples));
    averages.truncate(n);
    averages
}

/// Average delay per occurrence year, ascending.
pub fn avg_delay_by_year(records: &[&Record]) -> Vec<LabelAverage> {
    let mut years: BTreeMap<i32, Accumulator> = BTreeMap::new();
    for record in records {
        if let (Some(occurred), Some(days)) = (record.occurred, record_delay(record)) {
            years.entry(occurred.year()).or_default().add(days);
        }
    }
    years
        .into_iter()
        .map(|(year, acc)| LabelAverage {
            label: year.to_string(),
            average: acc.average(),
            samples: acc.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::record;

    #[test]
    fn test_next_day_report_is_one_to_three() {
        let r = record("Disk", "USA")
            .occurred("07/08/1947 10:00")
            .reported("07/09/1947")
            .build();
        assert_eq!(record_delay(&r), Some(1));
        let buckets = delay_buckets(&[&r]);
        assert_eq!(buckets[1], LabelCount::new("1-3", 1));
        assert_eq!(buckets.iter().map(|b| b.value).sum::<u64>(), 1);
    }

    #[test]
    fn test_bucket_edges() {
        assert_eq!(BUCKET_LABELS[bucket_index(0)], "0");
        assert_eq!(BUCKET_LABELS[bucket_index(3)], "1-3");
        assert_eq!(BUCKET_LABELS[bucket_index(4)], "4-7");
        assert_eq!(BUCKET_LABELS[bucket_index(14)], "8-14");
        assert_eq!(BUCKET_LABELS[bucket_index(30)], "15-30");
        assert_eq!(BUCKET_LABELS[bucket_index(90)], "31-90");
        assert_eq!(BUCKET_LABELS[bucket_index(365)], "91-365");
        assert_eq!(BUCKET_LABELS[bucket_index(366)], "366+");
    }

    #[test]
    fn test_report_before_sighting_clamps_to_zero() {
        let r = record("Disk", "USA")
            .occurred("07/08/1947 10:00")
            .reported("07/01/1947")
            .build();
        assert_eq!(record_delay(&r), Some(0));
    }

    #[test]
    fn test_missing_timestamp_contributes_nothing() {
        let no_report = record("Disk", "USA").occurred("07/08/1947 10:00").build();
        let no_occurrence = record("Disk", "USA").reported("07/09/1947").build();
        let buckets = delay_buckets(&[&no_report, &no_occurrence]);
        assert!(buckets.iter().all(|b| b.value == 0));
        assert!(avg_delay_by_country(&[&no_report, &no_occurrence], 10).is_empty());
        assert!(avg_delay_by_year(&[&no_report]).is_empty());
    }

    #[test]
    fn test_averages() {
        let a = record("Disk", "USA")
            .occurred("01/01/2000 00:00")
            .reported("01/03/2000")
            .build();
        let b = record("Disk", "USA")
            .occurred("01/01/2000 00:00")
            .reported("01/05/2000")
            .build();
        let c = record("Disk", "Canada")
            .occurred("01/01/2001 00:00")
            .reported("01/11/2001")
            .build();

        let by_country = avg_delay_by_country(&[&c, &a, &b], 10);
        assert_eq!(by_country[0].label, "USA");
        assert_eq!(by_country[0].average, 3.0);
        assert_eq!(by_country[0].samples, 2);
        assert_eq!(by_country[1].label, "Canada");

        let by_year = avg_delay_by_year(&[&c, &a, &b]);
        assert_eq!(by_year[0].label, "2000");
        assert_eq!(by_year[1].average, 10.0);
    }
}
