//! Challenge occurrence model
//!
//! One row per challenge per calendar date recording whether that day's
//! occurrence was completed, skipped, or left uncompleted. Completed
//! occurrences snapshot the exercise's calorie burn for the burn chart.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Occurrence status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceStatus {
    Completed,
    Uncompleted,
    Skipped,
}

impl OccurrenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OccurrenceStatus::Completed => "completed",
            OccurrenceStatus::Uncompleted => "uncompleted",
            OccurrenceStatus::Skipped => "skipped",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "completed" | "done" => Some(OccurrenceStatus::Completed),
            "uncompleted" => Some(OccurrenceStatus::Uncompleted),
            "skipped" | "skip" => Some(OccurrenceStatus::Skipped),
            _ => None,
        }
    }

    /// Completed and skipped both count toward a challenge's done total
    pub fn counts_as_done(&self) -> bool {
        matches!(self, OccurrenceStatus::Completed | OccurrenceStatus::Skipped)
    }
}

/// A dated occurrence of a challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occurrence {
    pub id: i64,
    pub challenge_id: i64,
    pub date: String, // ISO date
    pub status: OccurrenceStatus,
    pub calories_burned: Option<f64>,
}

/// A completed occurrence joined to its calorie burn, for the burn chart
#[derive(Debug, Clone, Serialize)]
pub struct BurnRecord {
    pub date: String,
    pub calories_burned: f64,
}

impl Occurrence {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let status_str: String = row.get("status")?;

        Ok(Self {
            id: row.get("id")?,
            challenge_id: row.get("challenge_id")?,
            date: row.get("date")?,
            status: OccurrenceStatus::from_str(&status_str)
                .unwrap_or(OccurrenceStatus::Uncompleted),
            calories_burned: row.get("calories_burned")?,
        })
    }

    /// Get the occurrence for a challenge on a date
    pub fn get(conn: &Connection, challenge_id: i64, date: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM challenge_occurrences WHERE challenge_id = ?1 AND date = ?2",
        )?;

        let result = stmt.query_row(params![challenge_id, date], Self::from_row);
        match result {
            Ok(occurrence) => Ok(Some(occurrence)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create the occurrence for a date or update its status if it exists
    pub fn create_or_update(
        conn: &Connection,
        challenge_id: i64,
        date: &str,
        status: OccurrenceStatus,
    ) -> DbResult<Self> {
        if let Some(existing) = Self::get(conn, challenge_id, date)? {
            if existing.status != status {
                conn.execute(
                    "UPDATE challenge_occurrences SET status = ?1 WHERE id = ?2",
                    params![status.as_str(), existing.id],
                )?;
            }
            return Self::get(conn, challenge_id, date)?.ok_or_else(|| {
                crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
            });
        }

        conn.execute(
            r#"
            INSERT INTO challenge_occurrences (challenge_id, date, status)
            VALUES (?1, ?2, ?3)
            "#,
            params![challenge_id, date, status.as_str()],
        )?;

        Self::get(conn, challenge_id, date)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Record the calorie snapshot on a completed occurrence
    pub fn set_calories(conn: &Connection, id: i64, calories: f64) -> DbResult<()> {
        conn.execute(
            "UPDATE challenge_occurrences SET calories_burned = ?1 WHERE id = ?2",
            params![calories, id],
        )?;
        Ok(())
    }

    /// Count a challenge's occurrences with the given status
    pub fn count_with_status(
        conn: &Connection,
        challenge_id: i64,
        status: OccurrenceStatus,
    ) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM challenge_occurrences WHERE challenge_id = ?1 AND status = ?2",
            params![challenge_id, status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count a challenge's done (completed or skipped) occurrences
    pub fn count_done(conn: &Connection, challenge_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            r#"SELECT COUNT(*) FROM challenge_occurrences
               WHERE challenge_id = ?1 AND status IN ('completed', 'skipped')"#,
            [challenge_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Whether the challenge already has a done occurrence on a date
    pub fn is_done_on(conn: &Connection, challenge_id: i64, date: &str) -> DbResult<bool> {
        let count: i64 = conn.query_row(
            r#"SELECT COUNT(*) FROM challenge_occurrences
               WHERE challenge_id = ?1 AND date = ?2 AND status IN ('completed', 'skipped')"#,
            params![challenge_id, date],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Completed occurrences joined to their calorie burn, ordered by date.
    /// Falls back to the exercise's catalog burn when the snapshot is
    /// missing.
    pub fn list_completed_burns(conn: &Connection) -> DbResult<Vec<BurnRecord>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT o.date AS date,
                   COALESCE(o.calories_burned, e.calories_burned) AS calories_burned
            FROM challenge_occurrences o
            JOIN challenges c ON c.id = o.challenge_id
            JOIN exercises e ON e.id = c.exercise_id
            WHERE o.status = 'completed'
            ORDER BY o.date
            "#,
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(BurnRecord {
                    date: row.get("date")?,
                    calories_burned: row.get("calories_burned")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
