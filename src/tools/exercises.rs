//! Exercise catalog tools

use serde::Serialize;

use crate::db::Database;
use crate::models::{Exercise, ExerciseCreate, GoalCategory, Intensity, MeasurementType};

/// Exercise summary for listing
#[derive(Debug, Serialize)]
pub struct ExerciseSummary {
    pub id: i64,
    pub name: String,
    pub goal_category: String,
    pub measurement: String,
    pub calories_burned: f64,
    pub intensity: String,
}

/// Response for list_exercises
#[derive(Debug, Serialize)]
pub struct ListExercisesResponse {
    pub exercises: Vec<ExerciseSummary>,
    pub total: usize,
}

impl From<&Exercise> for ExerciseSummary {
    fn from(exercise: &Exercise) -> Self {
        let measurement = match exercise.measurement_type {
            MeasurementType::Duration => match exercise.duration_minutes {
                Some(mins) => format!("{} min", mins),
                None => "duration".to_string(),
            },
            MeasurementType::RepsSets => match (exercise.reps, exercise.sets) {
                (Some(reps), Some(sets)) => format!("{} reps x {} sets", reps, sets),
                _ => "reps/sets".to_string(),
            },
        };

        Self {
            id: exercise.id,
            name: exercise.name.clone(),
            goal_category: exercise.goal_category.as_str().to_string(),
            measurement,
            calories_burned: exercise.calories_burned,
            intensity: exercise.intensity.as_str().to_string(),
        }
    }
}

/// Add an exercise to the catalog
#[allow(clippy::too_many_arguments)]
pub fn add_exercise(
    db: &Database,
    name: &str,
    goal_category: &str,
    measurement_type: &str,
    duration_minutes: Option<i64>,
    reps: Option<i64>,
    sets: Option<i64>,
    calories_burned: f64,
    intensity: &str,
    age_min: Option<i64>,
    age_max: Option<i64>,
) -> Result<Exercise, String> {
    let goal = GoalCategory::from_str(goal_category).ok_or_else(|| {
        format!(
            "Invalid goal category: '{}'. Valid: Weight Loss, Weight Gain, Build Muscle, Normal",
            goal_category
        )
    })?;
    let measurement = MeasurementType::from_str(measurement_type).ok_or_else(|| {
        format!(
            "Invalid measurement type: '{}'. Valid: duration, reps_sets",
            measurement_type
        )
    })?;
    let intensity = Intensity::from_str(intensity).ok_or_else(|| {
        format!("Invalid intensity: '{}'. Valid: Low, Moderate, High", intensity)
    })?;

    match measurement {
        MeasurementType::Duration if duration_minutes.is_none() => {
            return Err("duration_minutes is required for duration exercises".to_string());
        }
        MeasurementType::RepsSets if reps.is_none() || sets.is_none() => {
            return Err("reps and sets are required for reps_sets exercises".to_string());
        }
        _ => {}
    }

    if calories_burned <= 0.0 {
        return Err("calories_burned must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let data = ExerciseCreate {
        name: name.to_string(),
        goal_category: goal,
        measurement_type: measurement,
        duration_minutes,
        reps,
        sets,
        calories_burned,
        intensity,
        age_min,
        age_max,
    };

    Exercise::create(&conn, &data).map_err(|e| format!("Failed to create exercise: {}", e))
}

/// Delete an exercise (cascades to its challenges)
pub fn delete_exercise(
    db: &Database,
    id: i64,
) -> Result<super::checkins::DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted =
        Exercise::delete(&conn, id).map_err(|e| format!("Failed to delete exercise: {}", e))?;
    if !deleted {
        return Err(format!("Exercise not found with id: {}", id));
    }

    Ok(super::checkins::DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

/// List exercises, optionally filtered by goal category
pub fn list_exercises(
    db: &Database,
    goal_category: Option<&str>,
) -> Result<ListExercisesResponse, String> {
    let goal = match goal_category {
        Some(g) => Some(
            GoalCategory::from_str(g)
                .ok_or_else(|| format!("Invalid goal category: '{}'", g))?,
        ),
        None => None,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let exercises =
        Exercise::list(&conn, goal).map_err(|e| format!("Failed to list exercises: {}", e))?;

    let summaries: Vec<ExerciseSummary> = exercises.iter().map(ExerciseSummary::from).collect();
    let total = summaries.len();

    Ok(ListExercisesResponse {
        exercises: summaries,
        total,
    })
}
