//! Date utilities for dashboard analytics
//!
//! Stateless helpers for parsing stored date strings and deriving calendar
//! bucket keys, all plain functions over `chrono::NaiveDate`.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::Granularity;

/// Parse a stored date string into a calendar date.
///
/// Accepts plain ISO dates ("2024-01-09") and timestamps with a leading ISO
/// date ("2024-01-09T08:15:00", with or without a trailing zone marker).
/// Returns `None` for anything else.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }

    // Timestamps with a zone suffix ("2024-01-09T08:15:00Z"): the leading
    // ten characters are the calendar date.
    if let Some(prefix) = s.get(..10) {
        if s.len() > 10 && (s.as_bytes()[10] == b'T' || s.as_bytes()[10] == b' ') {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Some(date);
            }
        }
    }

    None
}

/// ISO-8601 year and week number for a date.
///
/// Weeks start on Monday; week 1 is the week containing the first Thursday
/// of the year, so the ISO year can differ from the calendar year at year
/// boundaries.
pub fn iso_week_of(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Compute the bucket key for a date at the given granularity.
///
/// Daily keys are "YYYY-MM-DD", weekly keys are "{iso_year}-W{iso_week}"
/// (week number not zero-padded, e.g. "2024-W1"), monthly keys are
/// "YYYY-MM".
pub fn bucket_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => date.format("%Y-%m-%d").to_string(),
        Granularity::Weekly => {
            let (year, week) = iso_week_of(date);
            format!("{}-W{}", year, week)
        }
        Granularity::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let date = parse_date("2024-01-09").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
    }

    #[test]
    fn test_parse_timestamp() {
        let date = parse_date("2024-01-09T08:15:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
    }

    #[test]
    fn test_parse_timestamp_with_zone() {
        let date = parse_date("2024-01-09T08:15:00Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-13-40"), None);
        assert_eq!(parse_date("20240109"), None);
    }

    #[test]
    fn test_iso_week_year_boundary() {
        // 2024-12-30 is a Monday belonging to ISO week 1 of 2025
        let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(iso_week_of(date), (2025, 1));

        // 2021-01-01 is a Friday belonging to ISO week 53 of 2020
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(iso_week_of(date), (2020, 53));
    }

    #[test]
    fn test_bucket_keys() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(bucket_key(date, Granularity::Daily), "2024-01-02");
        assert_eq!(bucket_key(date, Granularity::Weekly), "2024-W1");
        assert_eq!(bucket_key(date, Granularity::Monthly), "2024-01");
    }

    #[test]
    fn test_weekly_key_uses_iso_year() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(bucket_key(date, Granularity::Weekly), "2025-W1");
    }
}
