//! Health check-in model
//!
//! Represents a daily health check-in: one row per calendar date carrying
//! optional vitals and lifestyle metrics (heart rate, blood pressure,
//! weight, sleep, water, mood, stress, steps).

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Where a check-in came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckinSource {
    Manual,
    Device,
}

impl CheckinSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckinSource::Manual => "manual",
            CheckinSource::Device => "device",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manual" => Some(CheckinSource::Manual),
            "device" | "iot" => Some(CheckinSource::Device),
            _ => None,
        }
    }
}

impl Default for CheckinSource {
    fn default() -> Self {
        CheckinSource::Manual
    }
}

/// A chartable check-in metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthMetric {
    HeartRate,
    SystolicBp,
    DiastolicBp,
    Weight,
    SleepHours,
    WaterIntake,
    Mood,
    Stress,
    Steps,
}

impl HealthMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthMetric::HeartRate => "heart_rate",
            HealthMetric::SystolicBp => "systolic_bp",
            HealthMetric::DiastolicBp => "diastolic_bp",
            HealthMetric::Weight => "weight",
            HealthMetric::SleepHours => "sleep_hours",
            HealthMetric::WaterIntake => "water_intake",
            HealthMetric::Mood => "mood",
            HealthMetric::Stress => "stress",
            HealthMetric::Steps => "steps",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "heart_rate" | "hr" | "pulse" => Some(HealthMetric::HeartRate),
            "systolic_bp" | "systolic" => Some(HealthMetric::SystolicBp),
            "diastolic_bp" | "diastolic" => Some(HealthMetric::DiastolicBp),
            "weight" => Some(HealthMetric::Weight),
            "sleep_hours" | "sleep" => Some(HealthMetric::SleepHours),
            "water_intake" | "water" => Some(HealthMetric::WaterIntake),
            "mood" => Some(HealthMetric::Mood),
            "stress" => Some(HealthMetric::Stress),
            "steps" => Some(HealthMetric::Steps),
            _ => None,
        }
    }

}

/// A daily health check-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckin {
    pub id: i64,
    pub date: String, // ISO date: "2025-01-09"
    pub source: CheckinSource,
    pub heart_rate: Option<i64>,
    pub systolic_bp: Option<i64>,
    pub diastolic_bp: Option<i64>,
    pub weight: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub water_intake: Option<f64>,
    pub mood: Option<i64>,
    pub stress: Option<i64>,
    pub steps: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for recording a check-in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthCheckinCreate {
    pub date: Option<String>, // defaults to today
    pub source: Option<CheckinSource>,
    pub heart_rate: Option<i64>,
    pub systolic_bp: Option<i64>,
    pub diastolic_bp: Option<i64>,
    pub weight: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub water_intake: Option<f64>,
    pub mood: Option<i64>,
    pub stress: Option<i64>,
    pub steps: Option<i64>,
}

impl HealthCheckin {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let source_str: String = row.get("source")?;
        let source = CheckinSource::from_str(&source_str).unwrap_or_default();

        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            source,
            heart_rate: row.get("heart_rate")?,
            systolic_bp: row.get("systolic_bp")?,
            diastolic_bp: row.get("diastolic_bp")?,
            weight: row.get("weight")?,
            sleep_hours: row.get("sleep_hours")?,
            water_intake: row.get("water_intake")?,
            mood: row.get("mood")?,
            stress: row.get("stress")?,
            steps: row.get("steps")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Record a check-in. One row exists per date: recording again on the
    /// same date overwrites the metrics provided and leaves the rest.
    pub fn record(conn: &Connection, data: &HealthCheckinCreate) -> DbResult<Self> {
        let date = data
            .date
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());
        let source = data.source.unwrap_or_default();

        if let Some(existing) = Self::get_by_date(conn, &date)? {
            conn.execute(
                r#"
                UPDATE health_checkins SET
                    source = ?1,
                    heart_rate = COALESCE(?2, heart_rate),
                    systolic_bp = COALESCE(?3, systolic_bp),
                    diastolic_bp = COALESCE(?4, diastolic_bp),
                    weight = COALESCE(?5, weight),
                    sleep_hours = COALESCE(?6, sleep_hours),
                    water_intake = COALESCE(?7, water_intake),
                    mood = COALESCE(?8, mood),
                    stress = COALESCE(?9, stress),
                    steps = COALESCE(?10, steps),
                    updated_at = datetime('now')
                WHERE id = ?11
                "#,
                params![
                    source.as_str(),
                    data.heart_rate,
                    data.systolic_bp,
                    data.diastolic_bp,
                    data.weight,
                    data.sleep_hours,
                    data.water_intake,
                    data.mood,
                    data.stress,
                    data.steps,
                    existing.id,
                ],
            )?;
            return Self::get_by_id(conn, existing.id)?.ok_or_else(|| {
                crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
            });
        }

        conn.execute(
            r#"
            INSERT INTO health_checkins (
                date, source, heart_rate, systolic_bp, diastolic_bp,
                weight, sleep_hours, water_intake, mood, stress, steps
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                date,
                source.as_str(),
                data.heart_rate,
                data.systolic_bp,
                data.diastolic_bp,
                data.weight,
                data.sleep_hours,
                data.water_intake,
                data.mood,
                data.stress,
                data.steps,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a check-in by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM health_checkins WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(checkin) => Ok(Some(checkin)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a check-in by date
    pub fn get_by_date(conn: &Connection, date: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM health_checkins WHERE date = ?1")?;

        let result = stmt.query_row([date], Self::from_row);
        match result {
            Ok(checkin) => Ok(Some(checkin)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List check-ins with an optional inclusive date range, ordered by date
    pub fn list(
        conn: &Connection,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM health_checkins WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(start) = start_date {
            sql.push_str(&format!(" AND date >= ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(start.to_string()));
        }
        if let Some(end) = end_date {
            sql.push_str(&format!(" AND date <= ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(end.to_string()));
        }

        sql.push_str(" ORDER BY date ASC");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        let checkins = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(checkins)
    }

    /// Delete a check-in
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM health_checkins WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Value of a metric for this check-in, if recorded
    pub fn metric(&self, metric: HealthMetric) -> Option<f64> {
        match metric {
            HealthMetric::HeartRate => self.heart_rate.map(|v| v as f64),
            HealthMetric::SystolicBp => self.systolic_bp.map(|v| v as f64),
            HealthMetric::DiastolicBp => self.diastolic_bp.map(|v| v as f64),
            HealthMetric::Weight => self.weight,
            HealthMetric::SleepHours => self.sleep_hours,
            HealthMetric::WaterIntake => self.water_intake,
            HealthMetric::Mood => self.mood.map(|v| v as f64),
            HealthMetric::Stress => self.stress.map(|v| v as f64),
            HealthMetric::Steps => self.steps.map(|v| v as f64),
        }
    }
}
