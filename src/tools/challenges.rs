//! Challenge tools
//!
//! Creating challenges, listing what is due today, recording occurrences,
//! and rolling up achievement and progress reports.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::models::{
    is_due_on, progress_percent, Cadence, Challenge, ChallengeCreate, ChallengeStatus, Exercise,
    Occurrence, OccurrenceStatus,
};

/// A challenge joined to its exercise name
#[derive(Debug, Serialize)]
pub struct ChallengeView {
    pub id: i64,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub cadence: String,
    pub occurrence_count: i64,
    pub done_count: i64,
    pub status: String,
    pub progress_percent: f64,
    pub created_at: String,
    pub end_date: Option<String>,
}

/// Response for list_due_challenges
#[derive(Debug, Serialize)]
pub struct DueChallengesResponse {
    pub date: String,
    pub due: Vec<ChallengeView>,
    pub total: usize,
}

/// Response for record_occurrence
#[derive(Debug, Serialize)]
pub struct RecordOccurrenceResponse {
    pub challenge_id: i64,
    pub date: String,
    pub status: String,
    pub done_count: i64,
    pub occurrence_count: i64,
    pub progress_percent: f64,
    pub challenge_status: String,
    pub calories_burned: Option<f64>,
}

/// One name/value pair in the achievement summary
#[derive(Debug, Serialize)]
pub struct AchievementEntry {
    pub name: String,
    pub value: i64,
}

/// Response for achievement_summary
#[derive(Debug, Serialize)]
pub struct AchievementSummaryResponse {
    pub entries: Vec<AchievementEntry>,
}

/// Per-challenge row in the progress summary
#[derive(Debug, Serialize)]
pub struct ChallengeProgress {
    pub id: i64,
    pub exercise_name: String,
    pub cadence: String,
    pub completed_count: i64,
    pub skipped_count: i64,
    pub done_count: i64,
    pub expected_count: i64,
    pub occurrence_count: i64,
    pub progress_percent: f64,
    pub on_track: bool,
}

/// Response for progress_summary
#[derive(Debug, Serialize)]
pub struct ProgressSummaryResponse {
    pub challenges: Vec<ChallengeProgress>,
    pub total: usize,
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

fn view(
    conn: &rusqlite::Connection,
    challenge: &Challenge,
) -> Result<ChallengeView, String> {
    let exercise_name = Exercise::get_by_id(conn, challenge.exercise_id)
        .map_err(|e| format!("Database error: {}", e))?
        .map(|e| e.name)
        .unwrap_or_else(|| format!("exercise #{}", challenge.exercise_id));

    let done_count = Occurrence::count_done(conn, challenge.id)
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(ChallengeView {
        id: challenge.id,
        exercise_id: challenge.exercise_id,
        exercise_name,
        cadence: challenge.cadence.as_str().to_string(),
        occurrence_count: challenge.occurrence_count,
        done_count,
        status: challenge.status.as_str().to_string(),
        progress_percent: challenge.progress_percent,
        created_at: challenge.created_at.clone(),
        end_date: challenge.end_date.clone(),
    })
}

/// Create a challenge for a catalog exercise
pub fn create_challenge(
    db: &Database,
    exercise_id: i64,
    cadence: &str,
    occurrence_count: i64,
) -> Result<ChallengeView, String> {
    let cadence = Cadence::from_str(cadence)
        .ok_or_else(|| format!("Invalid cadence: '{}'. Valid: Daily, Weekly, Monthly", cadence))?;

    if occurrence_count <= 0 {
        return Err("occurrence_count must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if Exercise::get_by_id(&conn, exercise_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Exercise not found with id: {}", exercise_id));
    }

    let data = ChallengeCreate {
        exercise_id,
        cadence,
        occurrence_count,
    };
    let challenge =
        Challenge::create(&conn, &data).map_err(|e| format!("Failed to create challenge: {}", e))?;

    view(&conn, &challenge)
}

/// List open challenges
pub fn list_challenges(db: &Database) -> Result<Vec<ChallengeView>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let challenges =
        Challenge::list_open(&conn).map_err(|e| format!("Failed to list challenges: {}", e))?;

    challenges.iter().map(|c| view(&conn, c)).collect()
}

/// Challenges with an occurrence due on `date` (today when absent).
///
/// A due challenge is excluded once its occurrence for that day is already
/// done, or once it has reached its occurrence count.
pub fn list_due_challenges(
    db: &Database,
    date: Option<&str>,
) -> Result<DueChallengesResponse, String> {
    let target = match date {
        Some(d) => crate::analytics::dates::parse_date(d)
            .ok_or_else(|| format!("Invalid date: '{}'. Expected YYYY-MM-DD", d))?,
        None => today(),
    };
    let target_str = target.format("%Y-%m-%d").to_string();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let open =
        Challenge::list_open(&conn).map_err(|e| format!("Failed to list challenges: {}", e))?;

    let mut due = Vec::new();
    for challenge in &open {
        let created = match challenge.created_date() {
            Some(d) => d,
            None => continue,
        };
        if !is_due_on(challenge.cadence, created, target) {
            continue;
        }
        if Occurrence::is_done_on(&conn, challenge.id, &target_str)
            .map_err(|e| format!("Database error: {}", e))?
        {
            continue;
        }
        let done = Occurrence::count_done(&conn, challenge.id)
            .map_err(|e| format!("Database error: {}", e))?;
        if done >= challenge.occurrence_count {
            continue;
        }
        due.push(view(&conn, challenge)?);
    }

    let total = due.len();
    Ok(DueChallengesResponse {
        date: target_str,
        due,
        total,
    })
}

/// Record a challenge occurrence for a date (today when absent) and roll
/// the challenge's progress and status forward.
pub fn record_occurrence(
    db: &Database,
    challenge_id: i64,
    status: &str,
    date: Option<&str>,
) -> Result<RecordOccurrenceResponse, String> {
    let status = OccurrenceStatus::from_str(status).ok_or_else(|| {
        format!(
            "Invalid status: '{}'. Valid: completed, uncompleted, skipped",
            status
        )
    })?;

    let target_str = match date {
        Some(d) => {
            crate::analytics::dates::parse_date(d)
                .ok_or_else(|| format!("Invalid date: '{}'. Expected YYYY-MM-DD", d))?;
            d.to_string()
        }
        None => today().format("%Y-%m-%d").to_string(),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let challenge = Challenge::get_by_id(&conn, challenge_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Challenge not found with id: {}", challenge_id))?;

    let occurrence = Occurrence::create_or_update(&conn, challenge_id, &target_str, status)
        .map_err(|e| format!("Failed to record occurrence: {}", e))?;

    // Completed days snapshot the exercise's calorie burn for the burn chart.
    let mut calories = occurrence.calories_burned;
    if status == OccurrenceStatus::Completed && calories.is_none() {
        if let Some(exercise) = Exercise::get_by_id(&conn, challenge.exercise_id)
            .map_err(|e| format!("Database error: {}", e))?
        {
            Occurrence::set_calories(&conn, occurrence.id, exercise.calories_burned)
                .map_err(|e| format!("Database error: {}", e))?;
            calories = Some(exercise.calories_burned);
        }
    }

    let done = Occurrence::count_done(&conn, challenge_id)
        .map_err(|e| format!("Database error: {}", e))?;
    let progress = progress_percent(done, challenge.occurrence_count);

    let challenge_status = if done >= challenge.occurrence_count {
        Challenge::mark_completed(&conn, challenge_id)
            .map_err(|e| format!("Database error: {}", e))?;
        Challenge::set_progress(&conn, challenge_id, progress, ChallengeStatus::Completed)
            .map_err(|e| format!("Database error: {}", e))?;
        ChallengeStatus::Completed
    } else {
        Challenge::set_progress(&conn, challenge_id, progress, ChallengeStatus::InProgress)
            .map_err(|e| format!("Database error: {}", e))?;
        ChallengeStatus::InProgress
    };

    Ok(RecordOccurrenceResponse {
        challenge_id,
        date: target_str,
        status: status.as_str().to_string(),
        done_count: done,
        occurrence_count: challenge.occurrence_count,
        progress_percent: progress,
        challenge_status: challenge_status.as_str().to_string(),
        calories_burned: calories,
    })
}

/// Delete a challenge and its occurrences
pub fn delete_challenge(
    db: &Database,
    id: i64,
) -> Result<super::checkins::DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted =
        Challenge::delete(&conn, id).map_err(|e| format!("Failed to delete challenge: {}", e))?;
    if !deleted {
        return Err(format!("Challenge not found with id: {}", id));
    }

    Ok(super::checkins::DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

/// Counts of completed and in-progress challenges per cadence
pub fn achievement_summary(db: &Database) -> Result<AchievementSummaryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let mut entries = Vec::new();
    for cadence in [Cadence::Daily, Cadence::Weekly, Cadence::Monthly] {
        for status in [ChallengeStatus::Completed, ChallengeStatus::InProgress] {
            let count = Challenge::count_by_status(&conn, cadence, status)
                .map_err(|e| format!("Database error: {}", e))?;
            entries.push(AchievementEntry {
                name: format!("{} {}", cadence.as_str(), status.display_name()),
                value: count,
            });
        }
    }

    Ok(AchievementSummaryResponse { entries })
}

/// How many occurrences of a challenge should have happened by `today`.
///
/// Capped at the challenge's occurrence count.
fn expected_by(cadence: Cadence, created: NaiveDate, today: NaiveDate, total: i64) -> i64 {
    let delta_days = (today - created).num_days();
    if delta_days < 0 {
        return 0;
    }
    let expected = match cadence {
        Cadence::Daily => delta_days + 1,
        Cadence::Weekly => delta_days / 7 + 1,
        Cadence::Monthly => {
            let months = (today.year() - created.year()) as i64 * 12
                + (today.month() as i64 - created.month() as i64);
            if today.day() >= created.day() {
                months + 1
            } else {
                months.max(0)
            }
        }
    };
    expected.min(total)
}

/// Per-challenge progress against the expected pace
pub fn progress_summary(db: &Database) -> Result<ProgressSummaryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let open =
        Challenge::list_open(&conn).map_err(|e| format!("Failed to list challenges: {}", e))?;
    let now = today();

    let mut rows = Vec::new();
    for challenge in &open {
        let created = match challenge.created_date() {
            Some(d) => d,
            None => continue,
        };
        let exercise_name = Exercise::get_by_id(&conn, challenge.exercise_id)
            .map_err(|e| format!("Database error: {}", e))?
            .map(|e| e.name)
            .unwrap_or_else(|| format!("exercise #{}", challenge.exercise_id));
        let completed =
            Occurrence::count_with_status(&conn, challenge.id, OccurrenceStatus::Completed)
                .map_err(|e| format!("Database error: {}", e))?;
        let skipped =
            Occurrence::count_with_status(&conn, challenge.id, OccurrenceStatus::Skipped)
                .map_err(|e| format!("Database error: {}", e))?;
        let done = completed + skipped;
        let expected = expected_by(challenge.cadence, created, now, challenge.occurrence_count);

        // Refresh the stored roll-up while we have the counts in hand.
        let progress = progress_percent(done, challenge.occurrence_count);
        let status = if done >= challenge.occurrence_count {
            ChallengeStatus::Completed
        } else {
            ChallengeStatus::InProgress
        };
        Challenge::set_progress(&conn, challenge.id, progress, status)
            .map_err(|e| format!("Database error: {}", e))?;

        rows.push(ChallengeProgress {
            id: challenge.id,
            exercise_name,
            cadence: challenge.cadence.as_str().to_string(),
            completed_count: completed,
            skipped_count: skipped,
            done_count: done,
            expected_count: expected,
            occurrence_count: challenge.occurrence_count,
            progress_percent: progress,
            on_track: done >= expected,
        });
    }

    let total = rows.len();
    Ok(ProgressSummaryResponse {
        challenges: rows,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expected_daily() {
        let created = date(2024, 3, 1);
        assert_eq!(expected_by(Cadence::Daily, created, date(2024, 3, 1), 30), 1);
        assert_eq!(expected_by(Cadence::Daily, created, date(2024, 3, 5), 30), 5);
        // capped at the occurrence count
        assert_eq!(expected_by(Cadence::Daily, created, date(2024, 5, 1), 30), 30);
    }

    #[test]
    fn test_expected_weekly() {
        let created = date(2024, 3, 1);
        assert_eq!(expected_by(Cadence::Weekly, created, date(2024, 3, 1), 8), 1);
        assert_eq!(expected_by(Cadence::Weekly, created, date(2024, 3, 7), 8), 1);
        assert_eq!(expected_by(Cadence::Weekly, created, date(2024, 3, 8), 8), 2);
    }

    #[test]
    fn test_expected_monthly() {
        let created = date(2024, 1, 15);
        assert_eq!(expected_by(Cadence::Monthly, created, date(2024, 1, 20), 6), 1);
        assert_eq!(expected_by(Cadence::Monthly, created, date(2024, 2, 14), 6), 1);
        assert_eq!(expected_by(Cadence::Monthly, created, date(2024, 2, 15), 6), 2);
    }

    #[test]
    fn test_expected_before_creation() {
        let created = date(2024, 3, 10);
        assert_eq!(expected_by(Cadence::Daily, created, date(2024, 3, 9), 10), 0);
    }
}
