//! Challenge model
//!
//! A challenge commits to repeating a catalog exercise on a cadence (daily,
//! weekly, or monthly) a fixed number of times. Completion is tracked
//! through challenge occurrences; progress and status are rolled up here.

use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// How often a challenge repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Daily => "Daily",
            Cadence::Weekly => "Weekly",
            Cadence::Monthly => "Monthly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Some(Cadence::Daily),
            "weekly" => Some(Cadence::Weekly),
            "monthly" => Some(Cadence::Monthly),
            _ => None,
        }
    }
}

/// Challenge lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    InProgress,
    Completed,
    Uncompleted,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::InProgress => "inprogress",
            ChallengeStatus::Completed => "completed",
            ChallengeStatus::Uncompleted => "uncompleted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "inprogress" | "in_progress" => Some(ChallengeStatus::InProgress),
            "completed" => Some(ChallengeStatus::Completed),
            "uncompleted" => Some(ChallengeStatus::Uncompleted),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ChallengeStatus::InProgress => "In Progress",
            ChallengeStatus::Completed => "Completed",
            ChallengeStatus::Uncompleted => "Uncompleted",
        }
    }
}

/// Whether a challenge created on `created` has an occurrence due on `today`.
///
/// Daily challenges are due every day from creation; weekly ones every
/// seventh day; monthly ones on the creation date's day of month.
pub fn is_due_on(cadence: Cadence, created: NaiveDate, today: NaiveDate) -> bool {
    let delta_days = (today - created).num_days();
    if delta_days < 0 {
        return false;
    }
    match cadence {
        Cadence::Daily => true,
        Cadence::Weekly => delta_days % 7 == 0,
        Cadence::Monthly => created.day() == today.day(),
    }
}

/// Progress percentage for `done` of `total` occurrences, rounded to 2
/// decimal places.
pub fn progress_percent(done: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    ((done as f64 / total as f64) * 100.0 * 100.0).round() / 100.0
}

/// A challenge commitment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: i64,
    pub exercise_id: i64,
    pub cadence: Cadence,
    pub occurrence_count: i64,
    pub status: ChallengeStatus,
    pub progress_percent: f64,
    pub created_at: String,
    pub end_date: Option<String>,
}

/// Data for creating a challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeCreate {
    pub exercise_id: i64,
    pub cadence: Cadence,
    pub occurrence_count: i64,
}

impl Challenge {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let cadence_str: String = row.get("cadence")?;
        let status_str: String = row.get("status")?;

        Ok(Self {
            id: row.get("id")?,
            exercise_id: row.get("exercise_id")?,
            cadence: Cadence::from_str(&cadence_str).unwrap_or(Cadence::Daily),
            occurrence_count: row.get("occurrence_count")?,
            status: ChallengeStatus::from_str(&status_str)
                .unwrap_or(ChallengeStatus::InProgress),
            progress_percent: row.get("progress_percent")?,
            created_at: row.get("created_at")?,
            end_date: row.get("end_date")?,
        })
    }

    /// Create a new challenge. The end date is fixed at creation from the
    /// cadence and occurrence count (N days, N weeks, or 30*N days out).
    pub fn create(conn: &Connection, data: &ChallengeCreate) -> DbResult<Self> {
        let now = chrono::Utc::now();
        let span = match data.cadence {
            Cadence::Daily => chrono::Duration::days(data.occurrence_count),
            Cadence::Weekly => chrono::Duration::weeks(data.occurrence_count),
            Cadence::Monthly => chrono::Duration::days(30 * data.occurrence_count),
        };
        let end_date = (now + span).format("%Y-%m-%dT%H:%M:%SZ").to_string();

        conn.execute(
            r#"
            INSERT INTO challenges (exercise_id, cadence, occurrence_count, end_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                data.exercise_id,
                data.cadence.as_str(),
                data.occurrence_count,
                end_date,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a challenge by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM challenges WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(challenge) => Ok(Some(challenge)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List challenges that are not yet completed
    pub fn list_open(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM challenges WHERE status != 'completed' ORDER BY created_at",
        )?;
        let challenges = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(challenges)
    }

    /// Count challenges of a cadence by status
    pub fn count_by_status(
        conn: &Connection,
        cadence: Cadence,
        status: ChallengeStatus,
    ) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM challenges WHERE cadence = ?1 AND status = ?2",
            params![cadence.as_str(), status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Persist recomputed progress and status
    pub fn set_progress(
        conn: &Connection,
        id: i64,
        progress: f64,
        status: ChallengeStatus,
    ) -> DbResult<()> {
        conn.execute(
            "UPDATE challenges SET progress_percent = ?1, status = ?2 WHERE id = ?3",
            params![progress, status.as_str(), id],
        )?;
        Ok(())
    }

    /// Mark completed now
    pub fn mark_completed(conn: &Connection, id: i64) -> DbResult<()> {
        let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        conn.execute(
            "UPDATE challenges SET status = 'completed', end_date = ?1 WHERE id = ?2",
            params![now, id],
        )?;
        Ok(())
    }

    /// Delete a challenge (cascades to its occurrences)
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM challenges WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Creation date as a calendar date
    pub fn created_date(&self) -> Option<NaiveDate> {
        crate::analytics::dates::parse_date(&self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_due_every_day() {
        let created = date(2024, 3, 1);
        assert!(is_due_on(Cadence::Daily, created, date(2024, 3, 1)));
        assert!(is_due_on(Cadence::Daily, created, date(2024, 3, 2)));
        assert!(is_due_on(Cadence::Daily, created, date(2024, 4, 15)));
    }

    #[test]
    fn test_weekly_due_every_seventh_day() {
        let created = date(2024, 3, 1);
        assert!(is_due_on(Cadence::Weekly, created, date(2024, 3, 1)));
        assert!(!is_due_on(Cadence::Weekly, created, date(2024, 3, 4)));
        assert!(is_due_on(Cadence::Weekly, created, date(2024, 3, 8)));
        assert!(is_due_on(Cadence::Weekly, created, date(2024, 3, 15)));
    }

    #[test]
    fn test_monthly_due_same_day_of_month() {
        let created = date(2024, 1, 15);
        assert!(is_due_on(Cadence::Monthly, created, date(2024, 2, 15)));
        assert!(!is_due_on(Cadence::Monthly, created, date(2024, 2, 14)));
    }

    #[test]
    fn test_not_due_before_creation() {
        let created = date(2024, 3, 10);
        assert!(!is_due_on(Cadence::Daily, created, date(2024, 3, 9)));
    }

    #[test]
    fn test_progress_percent_rounding() {
        assert_eq!(progress_percent(1, 3), 33.33);
        assert_eq!(progress_percent(2, 3), 66.67);
        assert_eq!(progress_percent(3, 3), 100.0);
        assert_eq!(progress_percent(0, 0), 0.0);
    }
}
