//! Time-bucketed series. Only records with a parsable occurrence timestamp
//! contribute; everything else is silently left out.

use chrono::{Datelike, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::time::{
    decade_of, hour_index, month_index, weekday_index, MONTH_LABELS, WEEKDAY_LABELS,
};
use crate::models::Record;
use crate::services::aggregate::{DateSpan, LabelCount, Matrix};
use crate::services::categorical::top_n;

fn timestamps<'a>(records: &'a [&'a Record]) -> impl Iterator<Item = NaiveDateTime> + 'a {
    records.iter().filter_map(|r| r.occurred)
}

/// Label of a decade, e.g. `1940s`.
pub fn decade_label(decade: i32) -> String {
    format!("{}s", decade)
}

/// Earliest and latest occurrence dates.
pub fn date_span(records: &[&Record]) -> Option<DateSpan> {
    let mut dates = timestamps(records).map(|ts| ts.date());
    let first = dates.next()?;
    let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(DateSpan { start, end })
}

/// Counts per year, ascending.
pub fn by_year(records: &[&Record]) -> Vec<LabelCount> {
    let mut years: BTreeMap<i32, u64> = BTreeMap::new();
    for ts in timestamps(records) {
        *years.entry(ts.year()).or_insert(0) += 1;
    }
    years
        .into_iter()
        .map(|(year, count)| LabelCount::new(year.to_string(), count))
        .collect()
}

fn fixed_buckets<const N: usize>(
    records: &[&Record],
    labels: [&str; N],
    index: fn(&NaiveDateTime) -> usize,
) -> Vec<LabelCount> {
    let mut counts = [0u64; N];
    for ts in timestamps(records) {
        counts[index(&ts)] += 1;
    }
    labels
        .iter()
        .zip(counts)
        .map(|(label, count)| LabelCount::new(*label, count))
        .collect()
}

/// Always 12 entries, `Jan` to `Dec`.
pub fn by_month(records: &[&Record]) -> Vec<LabelCount> {
    fixed_buckets(records, MONTH_LABELS, month_index)
}

/// Always 7 entries, `Sun` to `Sat`.
pub fn by_weekday(records: &[&Record]) -> Vec<LabelCount> {
    fixed_buckets(records, WEEKDAY_LABELS, weekday_index)
}

/// Always 24 entries, `00` to `23`.
pub fn by_hour(records: &[&Record]) -> Vec<LabelCount> {
    let mut counts = [0u64; 24];
    for ts in timestamps(records) {
        counts[hour_index(&ts)] += 1;
    }
    counts
        .iter()
        .enumerate()
        .map(|(hour, count)| LabelCount::new(format!("{:02}", hour), *count))
        .collect()
}

/// Counts per decade, ascending.
pub fn by_decade(records: &[&Record]) -> Vec<LabelCount> {
    let mut decades: BTreeMap<i32, u64> = BTreeMap::new();
    for ts in timestamps(records) {
        *decades.entry(decade_of(ts.year())).or_insert(0) += 1;
    }
    decades
        .into_iter()
        .map(|(decade, count)| LabelCount::new(decade_label(decade), count))
        .collect()
}

/// Running total over `by_year`.
pub fn cumulative(yearly: &[LabelCount]) -> Vec<LabelCount> {
    yearly
        .iter()
        .scan(0u64, |total, entry| {
            *total += entry.value;
            Some(LabelCount::new(entry.label.clone(), *total))
        })
        .collect()
}

/// 12 x 24 month-by-hour counts.
pub fn month_hour(records: &[&Record]) -> Matrix {
    let mut matrix = Matrix::zeros(
        MONTH_LABELS.iter().map(|m| m.to_string()).collect(),
        (0..24).map(|h| format!("{:02}", h)).collect(),
    );
    for ts in timestamps(records) {
        matrix.increment(month_index(&ts), hour_index(&ts));
    }
    matrix
}

/// Counts per decade for the `shape_count` most frequent shapes.
///
/// Shapes are ranked over every record (timestamped or not); columns are the
/// decades present among timestamped records.
pub fn shape_by_decade(records: &[&Record], shape_count: usize) -> Matrix {
    let shapes: Vec<String> = top_n(records.iter().map(|r| r.shape.as_str()), shape_count)
        .into_iter()
        .map(|c| c.label)
        .collect();

    let decades: BTreeSet<i32> = timestamps(records)
        .map(|ts| decade_of(ts.year()))
        .collect();
    let decades: Vec<i32> = decades.into_iter().collect();

    let mut matrix = Matrix::zeros(
        shapes.clone(),
        decades.iter().map(|d| decade_label(*d)).collect(),
    );

    for record in records {
        let ts = match record.occurred {
            Some(ts) => ts,
            None => continue,
        };
        let row = match shapes.iter().position(|s| *s == record.shape) {
            Some(row) => row,
            None => continue,
        };
        if let Ok(col) = decades.binary_search(&decade_of(ts.year())) {
            matrix.increment(row, col);
        }
    }

    matrix
}
