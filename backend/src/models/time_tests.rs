#[cfg(test)]
mod tests {
    use crate::models::time::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_parse_us_datetime() {
        let ts = parse_occurred("07/08/1947 10:00").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(1947, 7, 8).unwrap());
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_twelve_hour_clock() {
        let ts = parse_occurred("12/31/1999 11:45 PM").unwrap();
        assert_eq!(ts.hour(), 23);
        assert_eq!(ts.minute(), 45);
    }

    #[test]
    fn test_parse_iso_datetime() {
        let ts = parse_occurred("2020-03-14T21:05:00").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2020, 3, 14).unwrap());
        assert_eq!(ts.hour(), 21);
    }

    #[test]
    fn test_date_only_occurrence_is_midnight() {
        let ts = parse_occurred("01/02/2003").unwrap();
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_unparsable_occurrence() {
        assert!(parse_occurred("").is_none());
        assert!(parse_occurred("   ").is_none());
        assert!(parse_occurred("sometime in the 70s").is_none());
        assert!(parse_occurred("13/45/2001 10:00").is_none());
    }

    #[test]
    fn test_parse_reported_variants() {
        let expected = NaiveDate::from_ymd_opt(1947, 7, 9).unwrap();
        assert_eq!(parse_reported("07/09/1947"), Some(expected));
        assert_eq!(parse_reported("1947-07-09"), Some(expected));
        assert_eq!(parse_reported("07/09/1947 08:30"), Some(expected));
        assert!(parse_reported("n/a").is_none());
    }

    #[test]
    fn test_report_delay_counts_calendar_days() {
        let occurred = parse_occurred("07/08/1947 10:00").unwrap();
        let reported = parse_reported("07/09/1947").unwrap();
        assert_eq!(report_delay_days(occurred, reported), 1);
    }

    #[test]
    fn test_report_delay_clamped_at_zero() {
        let occurred = parse_occurred("07/08/1947 10:00").unwrap();
        let reported = parse_reported("07/01/1947").unwrap();
        assert_eq!(report_delay_days(occurred, reported), 0);
    }

    #[test]
    fn test_decade_of() {
        assert_eq!(decade_of(1947), 1940);
        assert_eq!(decade_of(1950), 1950);
        assert_eq!(decade_of(2009), 2000);
    }

    #[test]
    fn test_indices() {
        // 1947-07-08 was a Tuesday
        let ts = parse_occurred("07/08/1947 10:00").unwrap();
        assert_eq!(month_index(&ts), 6);
        assert_eq!(weekday_index(&ts), 2);
        assert_eq!(hour_index(&ts), 10);
        assert_eq!(MONTH_LABELS[month_index(&ts)], "Jul");
        assert_eq!(WEEKDAY_LABELS[weekday_index(&ts)], "Tue");
    }
}
