#[cfg(test)]
mod tests {
    use crate::config::AnalyticsSettings;
    use crate::models::Record;
    use crate::services::aggregate::{aggregate, LabelCount};
    use crate::services::filter::{Dimension, FilterState, FilterUpdate};
    use crate::test_fixtures::record;
    use chrono::NaiveDate;

    fn fixture() -> Vec<Record> {
        vec![
            record("Disk", "USA")
                .state("NM")
                .city("Roswell")
                .occurred("07/08/1947 10:00")
                .reported("07/09/1947")
                .coords("33.39", "-104.52")
                .image()
                .build(),
            record("Light", "USA")
                .state("AZ")
                .city("Phoenix")
                .occurred("03/13/1997 20:30")
                .reported("03/20/1997")
                .coords("33.45", "-112.07")
                .build(),
            record("Light", "Canada")
                .state("ON")
                .city("Toronto")
                .occurred("06/01/2005 23:15")
                .coords("43.65", "-79.38")
                .build(),
            record("Orb", "USA")
                .state("TX")
                .coords("37.0902", "-95.7129")
                .build(),
            record("Unknown", "Australia")
                .occurred("12/31/2010 01:00")
                .reported("01/02/2011")
                .coords("-33.87", "151.21")
                .build(),
        ]
    }

    #[test]
    fn test_unfiltered_bundle_counts() {
        let records = fixture();
        let bundle = aggregate(&records, &FilterState::new(), &AnalyticsSettings::default());

        assert_eq!(bundle.total_records, 5);
        assert_eq!(bundle.filtered_records, 5);
        assert_eq!(bundle.top_shapes[0], LabelCount::new("Light", 2));
        assert_eq!(bundle.top_countries[0], LabelCount::new("USA", 3));
        assert_eq!(bundle.top_states.len(), 3);
        assert!(bundle.top_states.iter().all(|s| s.label != "ON"));
        assert_eq!(bundle.by_year.len(), 4);
        assert_eq!(bundle.cumulative_by_year.last().unwrap().value, 4);
        assert_eq!(bundle.month_hour.total(), 4);
        assert_eq!(bundle.image_split[0].value, 1);
    }

    #[test]
    fn test_quality_partition_holds_globally_and_per_country() {
        let records = fixture();
        let bundle = aggregate(&records, &FilterState::new(), &AnalyticsSettings::default());

        let q = bundle.coordinate_quality;
        assert_eq!(q.total, q.valid + q.zero + q.placeholder + q.invalid);
        assert_eq!(q.placeholder, 1);
        for tally in bundle.coordinate_quality_by_country.values() {
            assert_eq!(tally.total, tally.bucket_sum());
        }
        let total: u64 = bundle
            .coordinate_quality_by_country
            .values()
            .map(|t| t.total)
            .sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_scatter_excludes_placeholder_and_keeps_indices() {
        let records = fixture();
        let bundle = aggregate(&records, &FilterState::new(), &AnalyticsSettings::default());
        let indices: Vec<usize> = bundle.scatter_sample.iter().map(|p| p.record_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 4]);
        assert_eq!(bundle.hemispheres.north, 3);
        assert_eq!(bundle.hemispheres.south, 1);
    }

    #[test]
    fn test_delay_counts_only_complete_records() {
        let records = fixture();
        let bundle = aggregate(&records, &FilterState::new(), &AnalyticsSettings::default());
        let samples: u64 = bundle.delay_buckets.iter().map(|b| b.value).sum();
        assert_eq!(samples, 3);
        assert_eq!(bundle.delay_buckets[1], LabelCount::new("1-3", 2));
        assert_eq!(bundle.delay_buckets[2], LabelCount::new("4-7", 1));
    }

    #[test]
    fn test_filter_applies_to_every_metric() {
        let records = fixture();
        let mut filter = FilterState::new();
        filter.toggle(Dimension::Country, "USA");
        let bundle = aggregate(&records, &filter, &AnalyticsSettings::default());

        assert_eq!(bundle.filtered_records, 3);
        assert_eq!(bundle.top_countries, vec![LabelCount::new("USA", 3)]);
        assert_eq!(bundle.coordinate_quality.total, 3);
        assert_eq!(bundle.hemispheres.south, 0);
        assert_eq!(bundle.scatter_sample.len(), 2);
    }

    #[test]
    fn test_date_filter_and_span() {
        let records = fixture();
        let mut filter = FilterState::new();
        filter.apply(FilterUpdate {
            start: NaiveDate::from_ymd_opt(1990, 1, 1),
            end: NaiveDate::from_ymd_opt(2005, 6, 1),
            ..Default::default()
        });
        let bundle = aggregate(&records, &filter, &AnalyticsSettings::default());

        assert_eq!(bundle.filtered_records, 2);
        let span = bundle.date_span.unwrap();
        assert_eq!(span.start, NaiveDate::from_ymd_opt(1997, 3, 13).unwrap());
        assert_eq!(span.end, NaiveDate::from_ymd_opt(2005, 6, 1).unwrap());
    }

    #[test]
    fn test_empty_filter_result() {
        let records = fixture();
        let mut filter = FilterState::new();
        filter.toggle(Dimension::Shape, "Cigar");
        let bundle = aggregate(&records, &filter, &AnalyticsSettings::default());

        assert_eq!(bundle.filtered_records, 0);
        assert!(bundle.top_shapes.is_empty());
        assert_eq!(bundle.by_month.len(), 12);
        assert!(bundle.date_span.is_none());
        assert_eq!(bundle.month_hour.max(), 0);
        assert!(bundle.shape_by_decade.is_empty());
        assert!(bundle.scatter_sample.is_empty());
    }

    #[test]
    fn test_top_n_and_sample_settings() {
        let records = fixture();
        let settings = AnalyticsSettings {
            top_n: 1,
            sample_size: 2,
            ..Default::default()
        };
        let bundle = aggregate(&records, &FilterState::new(), &settings);
        assert_eq!(bundle.top_shapes.len(), 1);
        assert_eq!(bundle.top_countries.len(), 1);
        assert_eq!(bundle.avg_delay_by_country.len(), 1);
        assert_eq!(bundle.scatter_sample.len(), 2);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let records = fixture();
        let before = records.clone();
        let _ = aggregate(&records, &FilterState::new(), &AnalyticsSettings::default());
        assert_eq!(records, before);
    }

    #[test]
    fn test_bundle_serializes() {
        let records = fixture();
        let bundle = aggregate(&records, &FilterState::new(), &AnalyticsSettings::default());
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["filtered_records"], 5);
        assert!(json["month_hour"]["cells"].is_array());
    }
}
