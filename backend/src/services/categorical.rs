//! Top-N categorical counts.

use std::collections::HashMap;

use crate::models::Record;
use crate::services::aggregate::LabelCount;

pub const WITH_IMAGE: &str = "With image";
pub const WITHOUT_IMAGE: &str = "Without image";

/// Count values in first-encountered order.
pub fn count_in_order<'a, I>(values: I) -> Vec<LabelCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<LabelCount> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].value += 1,
            None => {
                index.insert(value, counts.len());
                counts.push(LabelCount::new(value, 1));
            }
        }
    }

    counts
}

/// Count, sort descending, keep the first `n`.
///
/// `sort_by` is stable, so equal counts keep first-encountered order.
pub fn top_n<'a, I>(values: I, n: usize) -> Vec<LabelCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = count_in_order(values);
    counts.sort_by(|a, b| b.value.cmp(&a.value));
    counts.truncate(n);
    counts
}

pub fn top_shapes(records: &[&Record], n: usize) -> Vec<LabelCount> {
    top_n(records.iter().map(|r| r.shape.as_str()), n)
}

pub fn top_countries(records: &[&Record], n: usize) -> Vec<LabelCount> {
    top_n(records.iter().map(|r| r.country.as_str()), n)
}

/// Top cities; records without a city are not counted.
pub fn top_cities(records: &[&Record], n: usize) -> Vec<LabelCount> {
    top_n(records.iter().filter_map(|r| r.city.as_deref()), n)
}

/// Top states among records of the domestic country.
///
/// State values are only meaningful for that country, so other records never
/// contribute here.
pub fn top_states(records: &[&Record], domestic_country: &str, n: usize) -> Vec<LabelCount> {
    top_n(
        records
            .iter()
            .filter(|r| r.country == domestic_country)
            .filter_map(|r| r.state.as_deref()),
        n,
    )
}

/// Two-entry split on the image flag, "With image" first.
pub fn image_split(records: &[&Record]) -> Vec<LabelCount> {
    let with = records.iter().filter(|r| r.has_image).count() as u64;
    let without = records.len() as u64 - with;
    vec![
        LabelCount::new(WITH_IMAGE, with),
        LabelCount::new(WITHOUT_IMAGE, without),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::record;

    #[test]
    fn test_top_n_sorted_and_truncated() {
        let values = ["a", "b", "b", "c", "c", "c"];
        let top = top_n(values.iter().copied(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], LabelCount::new("c", 3));
        assert_eq!(top[1], LabelCount::new("b", 2));
    }

    #[test]
    fn test_top_n_ties_keep_first_seen_order() {
        let values = ["x", "y", "z", "y", "x", "z"];
        let top = top_n(values.iter().copied(), 10);
        let labels: Vec<&str> = top.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_top_n_zero_and_empty() {
        assert!(top_n(["a"].iter().copied(), 0).is_empty());
        assert!(top_n(std::iter::empty(), 5).is_empty());
    }

    #[test]
    fn test_top_states_domestic_only() {
        let records = vec![
            record("Disk", "USA").state("NM").build(),
            record("Disk", "USA").state("NM").build(),
            record("Disk", "Canada").state("ON").build(),
            record("Disk", "USA").build(),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let states = top_states(&refs, "USA", 10);
        assert_eq!(states, vec![LabelCount::new("NM", 2)]);
    }

    #[test]
    fn test_cities_skip_missing() {
        let records = vec![
            record("Disk", "USA").city("Phoenix").build(),
            record("Disk", "USA").build(),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(top_cities(&refs, 10), vec![LabelCount::new("Phoenix", 1)]);
    }

    #[test]
    fn test_image_split() {
        let records = vec![
            record("Disk", "USA").image().build(),
            record("Orb", "USA").build(),
            record("Orb", "USA").build(),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let split = image_split(&refs);
        assert_eq!(split[0], LabelCount::new(WITH_IMAGE, 1));
        assert_eq!(split[1], LabelCount::new(WITHOUT_IMAGE, 2));
    }
}
