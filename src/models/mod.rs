//! Data models
//!
//! Rust structs representing database entities.

mod challenge;
mod checkin;
mod exercise;
mod food;
mod meal_entry;
mod occurrence;

pub use challenge::{
    is_due_on, progress_percent, Cadence, Challenge, ChallengeCreate, ChallengeStatus,
};
pub use checkin::{CheckinSource, HealthCheckin, HealthCheckinCreate, HealthMetric};
pub use exercise::{Exercise, ExerciseCreate, GoalCategory, Intensity, MeasurementType};
pub use food::{FoodCategory, FoodItem, FoodItemCreate, FoodSize, FoodUnit, UnitType};
pub use meal_entry::{calories_for, MealEntry, MealEntryCreate, MealType};
pub use occurrence::{BurnRecord, Occurrence, OccurrenceStatus};
