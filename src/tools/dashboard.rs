//! Dashboard summary tools
//!
//! Chart-ready series built from stored data: each summary pulls date-ordered
//! rows, maps them to samples, restricts them to the requested window, and
//! buckets them by calendar period.

use serde::Serialize;

use crate::analytics::{
    bucket_with, filter_by_range, Aggregation, BucketedPoint, DateRange, Granularity, Sample,
};
use crate::db::Database;
use crate::models::{HealthCheckin, HealthMetric, MealEntry, MealType, Occurrence};

/// A chart-ready summary series
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub metric: String,
    pub granularity: String,
    pub aggregation: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub points: Vec<BucketedPoint>,
}

fn parse_granularity(s: Option<&str>) -> Result<Granularity, String> {
    match s {
        Some(g) => Granularity::from_str(g)
            .ok_or_else(|| format!("Invalid granularity: '{}'. Valid: Daily, Weekly, Monthly", g)),
        None => Ok(Granularity::Daily),
    }
}

/// Window covering the last 30 days ending today
fn last_30_days() -> DateRange {
    let today = chrono::Utc::now().date_naive();
    let start = today - chrono::Duration::days(30);
    DateRange {
        start: Some(start.format("%Y-%m-%d").to_string()),
        end: Some(today.format("%Y-%m-%d").to_string()),
    }
}

fn window(start: Option<&str>, end: Option<&str>, default_last_30: bool) -> DateRange {
    if start.is_none() && end.is_none() && default_last_30 {
        return last_30_days();
    }
    DateRange {
        start: start.map(|s| s.to_string()),
        end: end.map(|s| s.to_string()),
    }
}

fn summarize(
    samples: Vec<Sample>,
    range: DateRange,
    granularity: Granularity,
    aggregation: Aggregation,
    ignore_missing: bool,
    metric: String,
) -> SummaryResponse {
    let filtered = filter_by_range(&samples, &range);
    let points = bucket_with(&filtered, granularity, aggregation, ignore_missing);

    SummaryResponse {
        metric,
        granularity: granularity.as_str().to_string(),
        aggregation: match aggregation {
            Aggregation::Mean => "mean".to_string(),
            Aggregation::Sum => "sum".to_string(),
        },
        start: range.start,
        end: range.end,
        points,
    }
}

/// Mean sleep hours per period.
///
/// Defaults to the last 30 days when no window is given.
pub fn sleep_summary(
    db: &Database,
    start: Option<&str>,
    end: Option<&str>,
    granularity: Option<&str>,
    ignore_missing: bool,
) -> Result<SummaryResponse, String> {
    let granularity = parse_granularity(granularity)?;
    let range = window(start, end, true);
    checkin_summary(db, HealthMetric::SleepHours, range, granularity, ignore_missing)
}

/// Mean of any check-in metric per period
pub fn health_summary(
    db: &Database,
    metric: &str,
    start: Option<&str>,
    end: Option<&str>,
    granularity: Option<&str>,
    ignore_missing: bool,
) -> Result<SummaryResponse, String> {
    let metric = HealthMetric::from_str(metric)
        .ok_or_else(|| format!("Unknown metric: '{}'", metric))?;
    let granularity = parse_granularity(granularity)?;
    let range = window(start, end, false);
    checkin_summary(db, metric, range, granularity, ignore_missing)
}

fn checkin_summary(
    db: &Database,
    metric: HealthMetric,
    range: DateRange,
    granularity: Granularity,
    ignore_missing: bool,
) -> Result<SummaryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    // Rows come back date-ordered so the bucketed series is chronological.
    let checkins = HealthCheckin::list(&conn, None, None)
        .map_err(|e| format!("Failed to list check-ins: {}", e))?;

    let samples: Vec<Sample> = checkins
        .iter()
        .map(|c| Sample {
            date: c.date.clone(),
            value: c.metric(metric),
        })
        .collect();

    Ok(summarize(
        samples,
        range,
        granularity,
        Aggregation::Mean,
        ignore_missing,
        metric.as_str().to_string(),
    ))
}

/// Total calories consumed per period, optionally one meal type.
///
/// Defaults to the last 30 days when no window is given.
pub fn consumption_summary(
    db: &Database,
    meal_type: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    granularity: Option<&str>,
) -> Result<SummaryResponse, String> {
    let meal_type = match meal_type {
        Some(mt) => Some(
            MealType::from_str(mt).ok_or_else(|| format!("Invalid meal type: '{}'", mt))?,
        ),
        None => None,
    };
    let granularity = parse_granularity(granularity)?;
    let range = window(start, end, true);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = MealEntry::list_for_summary(&conn, meal_type)
        .map_err(|e| format!("Failed to list meal entries: {}", e))?;

    let samples: Vec<Sample> = entries
        .iter()
        .map(|e| Sample {
            date: e.logged_at.clone(),
            value: Some(e.calories_consumed),
        })
        .collect();

    let metric = match meal_type {
        Some(mt) => format!("calories_consumed:{}", mt.as_str()),
        None => "calories_consumed".to_string(),
    };

    Ok(summarize(
        samples,
        range,
        granularity,
        Aggregation::Sum,
        false,
        metric,
    ))
}

/// Total calories burned by completed occurrences per period
pub fn burn_summary(
    db: &Database,
    start: Option<&str>,
    end: Option<&str>,
    granularity: Option<&str>,
) -> Result<SummaryResponse, String> {
    let granularity = parse_granularity(granularity)?;
    let range = window(start, end, false);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let burns = Occurrence::list_completed_burns(&conn)
        .map_err(|e| format!("Failed to list burns: {}", e))?;

    let samples: Vec<Sample> = burns
        .iter()
        .map(|b| Sample {
            date: b.date.clone(),
            value: Some(b.calories_burned),
        })
        .collect();

    Ok(summarize(
        samples,
        range,
        granularity,
        Aggregation::Sum,
        false,
        "calories_burned".to_string(),
    ))
}
