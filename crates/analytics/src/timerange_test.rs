//! Tests for time range parsing

use chrono::{NaiveDate, TimeZone, Utc};

use crate::timerange::{TimeRange, parse_date};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap()
}

#[test]
fn test_from_dates_extends_end_to_end_of_day() {
    let range = TimeRange::from_dates(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
    assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap());
    assert_eq!(range.days(), 31);
}

#[test]
fn test_from_dates_rejects_inverted() {
    assert!(TimeRange::from_dates(date(2024, 2, 1), date(2024, 1, 1)).is_err());
}

#[test]
fn test_from_bounds_requires_both() {
    assert!(TimeRange::from_bounds(None, None).unwrap().is_none());
    assert!(
        TimeRange::from_bounds(Some(date(2024, 1, 1)), None)
            .unwrap()
            .is_none()
    );
    assert!(
        TimeRange::from_bounds(None, Some(date(2024, 1, 1)))
            .unwrap()
            .is_none()
    );
    assert!(
        TimeRange::from_bounds(Some(date(2024, 1, 1)), Some(date(2024, 1, 2)))
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_single_day_contains_whole_day() {
    let range = TimeRange::single_day(date(2024, 5, 10));

    assert!(range.contains(Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap()));
    assert!(range.contains(Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()));
    assert!(range.contains(Utc.with_ymd_and_hms(2024, 5, 10, 23, 59, 59).unwrap()));

    assert!(!range.contains(Utc.with_ymd_and_hms(2024, 5, 9, 23, 59, 59).unwrap()));
    assert!(!range.contains(Utc.with_ymd_and_hms(2024, 5, 11, 0, 0, 0).unwrap()));
    assert_eq!(range.days(), 1);
}

#[test]
fn test_parse_relative_days() {
    let range = TimeRange::parse_at("7d", fixed_now()).unwrap();
    assert_eq!(range.days(), 7);
    assert_eq!(range.start_date(), date(2024, 3, 9));
    assert_eq!(range.end_date(), date(2024, 3, 15));

    let range = TimeRange::parse_at("30d", fixed_now()).unwrap();
    assert_eq!(range.days(), 30);
}

#[test]
fn test_parse_relative_weeks() {
    let range = TimeRange::parse_at("2w", fixed_now()).unwrap();
    assert_eq!(range.days(), 14);
}

#[test]
fn test_parse_predefined() {
    let today = TimeRange::parse_at("today", fixed_now()).unwrap();
    assert_eq!(today.start_date(), date(2024, 3, 15));
    assert_eq!(today.days(), 1);

    let yesterday = TimeRange::parse_at("yesterday", fixed_now()).unwrap();
    assert_eq!(yesterday.start_date(), date(2024, 3, 14));

    let mtd = TimeRange::parse_at("mtd", fixed_now()).unwrap();
    assert_eq!(mtd.start_date(), date(2024, 3, 1));
    assert_eq!(mtd.end_date(), date(2024, 3, 15));

    let ytd = TimeRange::parse_at("YTD", fixed_now()).unwrap();
    assert_eq!(ytd.start_date(), date(2024, 1, 1));
}

#[test]
fn test_parse_custom() {
    let range = TimeRange::parse_at("2024-01-01, 2024-01-31", fixed_now()).unwrap();
    assert_eq!(range.start_date(), date(2024, 1, 1));
    assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap());
}

#[test]
fn test_parse_custom_invalid_date() {
    assert!(TimeRange::parse_at("2024-13-01,2024-01-31", fixed_now()).is_err());
    assert!(TimeRange::parse_at("2024-02-01,2024-01-01", fixed_now()).is_err());
}

#[test]
fn test_parse_invalid() {
    assert!(TimeRange::parse_at("", fixed_now()).is_err());
    assert!(TimeRange::parse_at("forever", fixed_now()).is_err());
    assert!(TimeRange::parse_at("0d", fixed_now()).is_err());
    assert!(TimeRange::parse_at("-3d", fixed_now()).is_err());
    assert!(TimeRange::parse_at("5x", fixed_now()).is_err());
}

#[test]
fn test_new_rejects_end_before_start() {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert!(TimeRange::new(start, end).is_err());
    assert!(TimeRange::new(end, start).is_ok());
}

#[test]
fn test_parse_date() {
    assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
    assert!(parse_date("2023-02-29").is_err());
    assert!(parse_date("02/29/2024").is_err());
}
