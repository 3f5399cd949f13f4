//! Dashboard analytics
//!
//! The pure data pipeline behind the dashboard chart series: raw dated
//! samples are restricted to an inclusive date window, then grouped into
//! calendar buckets (day, ISO week, or month) and reduced to one aggregate
//! value per bucket. No I/O, no shared state; every call is independent and
//! idempotent.

pub mod dates;

use serde::{Deserialize, Serialize};

/// Calendar period used to group samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Some(Granularity::Daily),
            "weekly" | "week" => Some(Granularity::Weekly),
            "monthly" | "month" => Some(Granularity::Monthly),
            _ => None,
        }
    }
}

/// How a bucket's samples are reduced to one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    /// Sum divided by count, rounded to 2 decimal places
    Mean,
    /// Raw running total, no rounding
    Sum,
}

/// A single recorded observation: a calendar date and one numeric metric.
///
/// `value` is `None` when the sample exists but the selected metric was not
/// recorded (e.g. a health check-in without sleep hours).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub date: String,
    pub value: Option<f64>,
}

/// Inclusive date window; either bound may be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// One chart-ready point: a bucket key and its aggregate value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketedPoint {
    pub key: String,
    pub value: f64,
}

/// Restrict samples to an inclusive date window.
///
/// A sample passes when its date is on/after `range.start` and on/before
/// `range.end`; an absent bound skips that comparison. A sample whose date
/// fails to parse is dropped silently. A bound that fails to parse is
/// treated as absent.
pub fn filter_by_range(samples: &[Sample], range: &DateRange) -> Vec<Sample> {
    let start = range.start.as_deref().and_then(dates::parse_date);
    let end = range.end.as_deref().and_then(dates::parse_date);

    samples
        .iter()
        .filter(|sample| {
            let date = match dates::parse_date(&sample.date) {
                Some(d) => d,
                None => return false,
            };
            if let Some(from) = start {
                if date < from {
                    return false;
                }
            }
            if let Some(to) = end {
                if date > to {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

/// Group samples into calendar buckets and reduce each bucket.
///
/// Buckets are emitted in first-seen input order; callers that need
/// chronological output feed samples ordered by date. Samples with an
/// unparseable date are dropped silently. A sample with a missing value
/// contributes 0 to the bucket's sum while still counting toward the mean's
/// denominator; see [`bucket_with`] to exclude missing values instead.
pub fn bucket(
    samples: &[Sample],
    granularity: Granularity,
    aggregation: Aggregation,
) -> Vec<BucketedPoint> {
    bucket_with(samples, granularity, aggregation, false)
}

/// [`bucket`] with control over missing-value handling.
///
/// With `ignore_missing` set, samples whose value is absent are excluded
/// from both the sum and the count; a bucket whose samples are all missing
/// is omitted entirely.
pub fn bucket_with(
    samples: &[Sample],
    granularity: Granularity,
    aggregation: Aggregation,
    ignore_missing: bool,
) -> Vec<BucketedPoint> {
    use std::collections::hash_map::Entry;
    use std::collections::HashMap;

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (f64, u64)> = HashMap::new();

    for sample in samples {
        let date = match dates::parse_date(&sample.date) {
            Some(d) => d,
            None => continue,
        };
        if ignore_missing && sample.value.is_none() {
            continue;
        }

        let key = dates::bucket_key(date, granularity);
        let entry = match totals.entry(key) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                order.push(e.key().clone());
                e.insert((0.0, 0))
            }
        };
        entry.0 += sample.value.unwrap_or(0.0);
        entry.1 += 1;
    }

    order
        .into_iter()
        .map(|key| {
            let (sum, count) = totals[&key];
            let value = match aggregation {
                Aggregation::Mean => round2(sum / count as f64),
                Aggregation::Sum => sum,
            };
            BucketedPoint { key, value }
        })
        .collect()
}

/// Round to 2 decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(date: &str, value: f64) -> Sample {
        Sample {
            date: date.to_string(),
            value: Some(value),
        }
    }

    fn missing(date: &str) -> Sample {
        Sample {
            date: date.to_string(),
            value: None,
        }
    }

    #[test]
    fn test_daily_buckets() {
        let samples = vec![sample("2024-01-01", 6.0), sample("2024-01-02", 8.0)];
        let points = bucket(&samples, Granularity::Daily, Aggregation::Mean);
        assert_eq!(
            points,
            vec![
                BucketedPoint { key: "2024-01-01".into(), value: 6.0 },
                BucketedPoint { key: "2024-01-02".into(), value: 8.0 },
            ]
        );
    }

    #[test]
    fn test_weekly_mean() {
        // Both dates fall in ISO week 1 of 2024
        let samples = vec![sample("2024-01-01", 6.0), sample("2024-01-02", 8.0)];
        let points = bucket(&samples, Granularity::Weekly, Aggregation::Mean);
        assert_eq!(points, vec![BucketedPoint { key: "2024-W1".into(), value: 7.0 }]);
    }

    #[test]
    fn test_monthly_sum() {
        let samples = vec![
            sample("2024-01-01", 400.0),
            sample("2024-01-15", 350.5),
            sample("2024-02-01", 500.0),
        ];
        let points = bucket(&samples, Granularity::Monthly, Aggregation::Sum);
        assert_eq!(
            points,
            vec![
                BucketedPoint { key: "2024-01".into(), value: 750.5 },
                BucketedPoint { key: "2024-02".into(), value: 500.0 },
            ]
        );
    }

    #[test]
    fn test_output_length_matches_distinct_keys() {
        let samples = vec![
            sample("2024-01-01", 1.0),
            sample("2024-01-01", 2.0),
            sample("2024-01-02", 3.0),
            sample("2024-02-10", 4.0),
        ];
        let points = bucket(&samples, Granularity::Daily, Aggregation::Sum);
        assert_eq!(points.len(), 3);
        let points = bucket(&samples, Granularity::Monthly, Aggregation::Sum);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_mean_rounds_to_two_decimals() {
        let samples = vec![
            sample("2024-01-01", 7.0),
            sample("2024-01-02", 8.0),
            sample("2024-01-03", 8.0),
        ];
        let points = bucket(&samples, Granularity::Weekly, Aggregation::Mean);
        // 23 / 3 = 7.666... -> 7.67
        assert_eq!(points, vec![BucketedPoint { key: "2024-W1".into(), value: 7.67 }]);
    }

    #[test]
    fn test_first_seen_order_preserved() {
        let samples = vec![
            sample("2024-02-05", 1.0),
            sample("2024-01-10", 2.0),
            sample("2024-02-20", 3.0),
        ];
        let points = bucket(&samples, Granularity::Monthly, Aggregation::Sum);
        let keys: Vec<&str> = points.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-02", "2024-01"]);
    }

    #[test]
    fn test_idempotent() {
        let samples = vec![
            sample("2024-01-01", 6.5),
            missing("2024-01-01"),
            sample("2024-01-08", 7.25),
        ];
        let first = bucket(&samples, Granularity::Weekly, Aggregation::Mean);
        let second = bucket(&samples, Granularity::Weekly, Aggregation::Mean);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_date_dropped() {
        let samples = vec![
            Sample { date: "not-a-date".into(), value: Some(5.0) },
            sample("2024-01-02", 8.0),
        ];
        let points = bucket(&samples, Granularity::Daily, Aggregation::Mean);
        assert_eq!(points, vec![BucketedPoint { key: "2024-01-02".into(), value: 8.0 }]);
    }

    #[test]
    fn test_missing_value_counts_toward_mean() {
        let samples = vec![sample("2024-01-01", 6.0), missing("2024-01-01")];
        let points = bucket(&samples, Granularity::Daily, Aggregation::Mean);
        // (6 + 0) / 2
        assert_eq!(points, vec![BucketedPoint { key: "2024-01-01".into(), value: 3.0 }]);
    }

    #[test]
    fn test_missing_value_contributes_zero_to_sum() {
        let samples = vec![sample("2024-01-01", 450.0), missing("2024-01-01")];
        let points = bucket(&samples, Granularity::Daily, Aggregation::Sum);
        assert_eq!(points, vec![BucketedPoint { key: "2024-01-01".into(), value: 450.0 }]);
    }

    #[test]
    fn test_ignore_missing() {
        let samples = vec![
            sample("2024-01-01", 6.0),
            missing("2024-01-01"),
            missing("2024-01-02"),
        ];
        let points = bucket_with(&samples, Granularity::Daily, Aggregation::Mean, true);
        // Missing samples dropped from the denominator; all-missing bucket omitted
        assert_eq!(points, vec![BucketedPoint { key: "2024-01-01".into(), value: 6.0 }]);
    }

    #[test]
    fn test_empty_input() {
        assert!(bucket(&[], Granularity::Daily, Aggregation::Mean).is_empty());
        assert!(filter_by_range(&[], &DateRange::default()).is_empty());
    }

    #[test]
    fn test_filter_start_bound() {
        let samples = vec![sample("2024-01-01", 6.0), sample("2024-01-02", 8.0)];
        let range = DateRange { start: Some("2024-01-02".into()), end: None };
        let filtered = filter_by_range(&samples, &range);
        let points = bucket(&filtered, Granularity::Daily, Aggregation::Mean);
        assert_eq!(points, vec![BucketedPoint { key: "2024-01-02".into(), value: 8.0 }]);
    }

    #[test]
    fn test_filter_inclusive_bounds() {
        let samples = vec![
            sample("2024-01-01", 1.0),
            sample("2024-01-02", 2.0),
            sample("2024-01-03", 3.0),
        ];
        let range = DateRange {
            start: Some("2024-01-01".into()),
            end: Some("2024-01-02".into()),
        };
        let filtered = filter_by_range(&samples, &range);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].date, "2024-01-01");
        assert_eq!(filtered[1].date, "2024-01-02");
    }

    #[test]
    fn test_filter_drops_unparseable_sample_date() {
        let samples = vec![
            Sample { date: "not-a-date".into(), value: Some(5.0) },
            sample("2024-01-02", 8.0),
        ];
        let filtered = filter_by_range(&samples, &DateRange::default());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].date, "2024-01-02");
    }

    #[test]
    fn test_filter_invalid_bound_treated_as_absent() {
        let samples = vec![sample("2024-01-01", 6.0), sample("2024-01-02", 8.0)];
        let range = DateRange {
            start: Some("garbage".into()),
            end: Some("2024-01-01".into()),
        };
        let filtered = filter_by_range(&samples, &range);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].date, "2024-01-01");
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let samples = vec![sample("2024-01-01", 6.0)];
        let range = DateRange { start: Some("2024-02-01".into()), end: None };
        let filtered = filter_by_range(&samples, &range);
        assert!(filtered.is_empty());
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!(Granularity::from_str("Daily"), Some(Granularity::Daily));
        assert_eq!(Granularity::from_str("weekly"), Some(Granularity::Weekly));
        assert_eq!(Granularity::from_str("MONTH"), Some(Granularity::Monthly));
        assert_eq!(Granularity::from_str("yearly"), None);
    }
}
