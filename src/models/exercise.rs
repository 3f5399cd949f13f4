//! Exercise model
//!
//! Catalog of exercises with a goal category, measurement style (timed or
//! reps-and-sets), intensity, and the calories burned by one occurrence.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Fitness goal an exercise targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalCategory {
    WeightLoss,
    WeightGain,
    BuildMuscle,
    Normal,
}

impl GoalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalCategory::WeightLoss => "Weight Loss",
            GoalCategory::WeightGain => "Weight Gain",
            GoalCategory::BuildMuscle => "Build Muscle",
            GoalCategory::Normal => "Normal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', " ").as_str() {
            "weight loss" => Some(GoalCategory::WeightLoss),
            "weight gain" => Some(GoalCategory::WeightGain),
            "build muscle" => Some(GoalCategory::BuildMuscle),
            "normal" => Some(GoalCategory::Normal),
            _ => None,
        }
    }
}

/// How an exercise is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    Duration,
    RepsSets,
}

impl MeasurementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Duration => "duration",
            MeasurementType::RepsSets => "reps_sets",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "duration" => Some(MeasurementType::Duration),
            "reps_sets" | "reps" => Some(MeasurementType::RepsSets),
            _ => None,
        }
    }
}

/// Exercise intensity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "Low",
            Intensity::Moderate => "Moderate",
            Intensity::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Intensity::Low),
            "moderate" | "medium" => Some(Intensity::Moderate),
            "high" => Some(Intensity::High),
            _ => None,
        }
    }
}

/// A catalog exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub goal_category: GoalCategory,
    pub measurement_type: MeasurementType,
    pub duration_minutes: Option<i64>,
    pub reps: Option<i64>,
    pub sets: Option<i64>,
    pub calories_burned: f64,
    pub intensity: Intensity,
    pub age_min: i64,
    pub age_max: i64,
    pub created_at: String,
}

/// Data for adding an exercise to the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseCreate {
    pub name: String,
    pub goal_category: GoalCategory,
    pub measurement_type: MeasurementType,
    pub duration_minutes: Option<i64>,
    pub reps: Option<i64>,
    pub sets: Option<i64>,
    pub calories_burned: f64,
    pub intensity: Intensity,
    pub age_min: Option<i64>,
    pub age_max: Option<i64>,
}

impl Exercise {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let goal_str: String = row.get("goal_category")?;
        let measurement_str: String = row.get("measurement_type")?;
        let intensity_str: String = row.get("intensity")?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            goal_category: GoalCategory::from_str(&goal_str).unwrap_or(GoalCategory::Normal),
            measurement_type: MeasurementType::from_str(&measurement_str)
                .unwrap_or(MeasurementType::Duration),
            duration_minutes: row.get("duration_minutes")?,
            reps: row.get("reps")?,
            sets: row.get("sets")?,
            calories_burned: row.get("calories_burned")?,
            intensity: Intensity::from_str(&intensity_str).unwrap_or(Intensity::Moderate),
            age_min: row.get("age_min")?,
            age_max: row.get("age_max")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Add an exercise to the catalog
    pub fn create(conn: &Connection, data: &ExerciseCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO exercises (
                name, goal_category, measurement_type, duration_minutes,
                reps, sets, calories_burned, intensity, age_min, age_max
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.name,
                data.goal_category.as_str(),
                data.measurement_type.as_str(),
                data.duration_minutes,
                data.reps,
                data.sets,
                data.calories_burned,
                data.intensity.as_str(),
                data.age_min.unwrap_or(0),
                data.age_max.unwrap_or(120),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get an exercise by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(exercise) => Ok(Some(exercise)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List exercises, optionally filtered by goal category
    pub fn list(conn: &Connection, goal: Option<GoalCategory>) -> DbResult<Vec<Self>> {
        let mut stmt = match goal {
            Some(_) => conn.prepare(
                "SELECT * FROM exercises WHERE goal_category = ?1 ORDER BY name",
            )?,
            None => conn.prepare("SELECT * FROM exercises ORDER BY name")?,
        };

        let exercises = match goal {
            Some(g) => stmt
                .query_map([g.as_str()], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(exercises)
    }

    /// Delete an exercise (cascades to its challenges)
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM exercises WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
