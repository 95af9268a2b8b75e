//! Geographic metrics: coordinate quality tallies, hemisphere split and the
//! capped coordinate sample used by the scatter plot and the map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{CoordinateQuality, Record};
use crate::services::aggregate::LabelCount;

/// Record count per coordinate-quality bucket.
///
/// `total == valid + zero + placeholder + invalid` holds by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateTally {
    pub total: u64,
    pub valid: u64,
    pub zero: u64,
    pub placeholder: u64,
    pub invalid: u64,
}

impl CoordinateTally {
    pub fn add(&mut self, quality: CoordinateQuality) {
        self.total += 1;
        match quality {
            CoordinateQuality::Valid => self.valid += 1,
            CoordinateQuality::Zero => self.zero += 1,
            CoordinateQuality::Placeholder => self.placeholder += 1,
            CoordinateQuality::Invalid => self.invalid += 1,
        }
    }

    pub fn bucket_sum(&self) -> u64 {
        self.valid + self.zero + self.placeholder + self.invalid
    }

    /// Buckets as chart data, valid first.
    pub fn to_series(&self) -> Vec<LabelCount> {
        vec![
            LabelCount::new(CoordinateQuality::Valid.label(), self.valid),
            LabelCount::new(CoordinateQuality::Zero.label(), self.zero),
            LabelCount::new(CoordinateQuality::Placeholder.label(), self.placeholder),
            LabelCount::new(CoordinateQuality::Invalid.label(), self.invalid),
        ]
    }
}

/// Records with valid coordinates, split at the equator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hemispheres {
    pub north: u64,
    pub south: u64,
}

impl Hemispheres {
    pub fn to_series(&self) -> Vec<LabelCount> {
        vec![
            LabelCount::new("Northern", self.north),
            LabelCount::new("Southern", self.south),
        ]
    }
}

/// One plotted point; `record_index` points back into the loaded records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub latitude: f64,
    pub longitude: f64,
    pub record_index: usize,
}

pub fn tally<'a, I>(records: I) -> CoordinateTally
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut tally = CoordinateTally::default();
    for record in records {
        tally.add(record.quality);
    }
    tally
}

pub fn tally_by_country(records: &[&Record]) -> BTreeMap<String, CoordinateTally> {
    let mut tallies: BTreeMap<String, CoordinateTally> = BTreeMap::new();
    for record in records {
        tallies
            .entry(record.country.clone())
            .or_default()
            .add(record.quality);
    }
    tallies
}

pub fn hemispheres(records: &[&Record]) -> Hemispheres {
    let mut split = Hemispheres::default();
    for point in records.iter().filter_map(|r| r.position()) {
        if point.is_northern() {
            split.north += 1;
        } else {
            split.south += 1;
        }
    }
    split
}

/// First `limit` valid records, in record order.
pub fn scatter_sample<'a, I>(indexed: I, limit: usize) -> Vec<SamplePoint>
where
    I: IntoIterator<Item = (usize, &'a Record)>,
{
    indexed
        .into_iter()
        .filter_map(|(index, record)| {
            record.position().map(|p| SamplePoint {
                latitude: p.latitude,
                longitude: p.longitude,
                record_index: index,
            })
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::record;

    fn sample_records() -> Vec<Record> {
        vec![
            record("Disk", "USA").coords("37.0902", "-95.7129").build(),
            record("Disk", "USA").coords("33.4", "-112.0").build(),
            record("Orb", "Australia").coords("-33.8", "151.2").build(),
            record("Orb", "Australia").coords("0", "0").build(),
            record("Light", "USA").coords("abc", "1").build(),
        ]
    }

    #[test]
    fn test_tally_partitions_every_record() {
        let records = sample_records();
        let t = tally(&records);
        assert_eq!(t.total, 5);
        assert_eq!(t.valid, 2);
        assert_eq!(t.placeholder, 1);
        assert_eq!(t.zero, 1);
        assert_eq!(t.invalid, 1);
        assert_eq!(t.total, t.bucket_sum());
    }

    #[test]
    fn test_tally_by_country_partitions() {
        let records = sample_records();
        let refs: Vec<&Record> = records.iter().collect();
        let by_country = tally_by_country(&refs);
        assert_eq!(by_country.len(), 2);
        for t in by_country.values() {
            assert_eq!(t.total, t.bucket_sum());
        }
        assert_eq!(by_country["USA"].total, 3);
    }

    #[test]
    fn test_hemispheres_count_valid_only() {
        let records = sample_records();
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(hemispheres(&refs), Hemispheres { north: 1, south: 1 });
    }

    #[test]
    fn test_placeholder_excluded_from_sample() {
        let records = sample_records();
        let sample = scatter_sample(records.iter().enumerate(), 500);
        assert_eq!(sample.len(), 2);
        assert_eq!(sample[0].record_index, 1);
        assert_eq!(sample[1].record_index, 2);
    }

    #[test]
    fn test_sample_cap() {
        let records = sample_records();
        let sample = scatter_sample(records.iter().enumerate(), 1);
        assert_eq!(sample.len(), 1);
        assert_eq!(sample[0].latitude, 33.4);
    }
}
