//! FitTrack MCP Server Implementation
//!
//! Implements the MCP server with all FitTrack tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{CheckinSource, HealthCheckinCreate};
use crate::tools::status::{StatusTracker, DASHBOARD_INSTRUCTIONS};
use crate::tools::{challenges, checkins, dashboard, exercises, meals};

/// FitTrack MCP Service
#[derive(Clone)]
pub struct FittrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<FittrackService>,
}

impl FittrackService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Check-in Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecordCheckinParams {
    /// Date in ISO format: YYYY-MM-DD (defaults to today)
    pub date: Option<String>,
    /// Source: manual or device (default manual)
    pub source: Option<String>,
    /// Resting heart rate in bpm
    pub heart_rate: Option<i64>,
    /// Systolic blood pressure in mmHg
    pub systolic_bp: Option<i64>,
    /// Diastolic blood pressure in mmHg
    pub diastolic_bp: Option<i64>,
    /// Body weight
    pub weight: Option<f64>,
    /// Hours slept
    pub sleep_hours: Option<f64>,
    /// Water intake in liters
    pub water_intake: Option<f64>,
    /// Mood rating (1-10)
    pub mood: Option<i64>,
    /// Stress rating (1-10)
    pub stress: Option<i64>,
    /// Step count
    pub steps: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetCheckinParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListCheckinsParams {
    /// Start date (inclusive) - optional
    pub start_date: Option<String>,
    /// End date (inclusive) - optional
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteByIdParams {
    pub id: i64,
}

// ============================================================================
// Exercise Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddExerciseParams {
    /// Exercise name
    pub name: String,
    /// Goal category: Weight Loss, Weight Gain, Build Muscle, Normal
    pub goal_category: String,
    /// Measurement type: duration or reps_sets
    pub measurement_type: String,
    /// Duration in minutes (required for duration exercises)
    pub duration_minutes: Option<i64>,
    /// Repetitions per set (required for reps_sets exercises)
    pub reps: Option<i64>,
    /// Number of sets (required for reps_sets exercises)
    pub sets: Option<i64>,
    /// Calories burned per completed occurrence
    pub calories_burned: f64,
    /// Intensity: Low, Moderate, High
    pub intensity: String,
    /// Minimum recommended age (optional)
    pub age_min: Option<i64>,
    /// Maximum recommended age (optional)
    pub age_max: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListExercisesParams {
    /// Filter by goal category (optional)
    pub goal_category: Option<String>,
}

// ============================================================================
// Challenge Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateChallengeParams {
    /// Exercise ID from the catalog
    pub exercise_id: i64,
    /// Cadence: Daily, Weekly, Monthly
    pub cadence: String,
    /// Number of occurrences to complete
    pub occurrence_count: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDueChallengesParams {
    /// Date in ISO format: YYYY-MM-DD (defaults to today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecordOccurrenceParams {
    /// Challenge ID
    pub challenge_id: i64,
    /// Occurrence status: completed, uncompleted, skipped
    pub status: String,
    /// Date in ISO format: YYYY-MM-DD (defaults to today)
    pub date: Option<String>,
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodItemsParams {
    /// Filter by category ID (optional)
    pub category_id: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodCategoryParams {
    /// Category name (e.g., "Fruits")
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodSizeParams {
    /// Portion name (e.g., "Small")
    pub name: String,
    /// Multiplier applied to the default serving (e.g., 0.5)
    pub multiplier: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodItemParams {
    /// Food category ID
    pub category_id: i64,
    /// Food name
    pub name: String,
    /// Default serving size in the serving unit
    pub default_serving_size: f64,
    /// Serving unit ID
    pub default_serving_unit_id: i64,
    /// Calories in one default serving
    pub calories_per_default: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodUnitParams {
    /// Unit name (e.g., "gram")
    pub name: String,
    /// Abbreviation (e.g., "g")
    pub abbreviation: String,
    /// Unit type: mass, volume, count
    pub unit_type: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    /// Meal type: breakfast, lunch, dinner
    pub meal_type: String,
    /// Food item ID from the catalog
    pub food_item_id: i64,
    /// Portion size ID (optional; default serving when absent)
    pub size_id: Option<i64>,
    /// Number of servings
    pub quantity: f64,
    /// Timestamp (defaults to now)
    pub logged_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealEntriesParams {
    /// Filter by meal type (optional)
    pub meal_type: Option<String>,
    /// Maximum results (default 50)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

fn default_list_limit() -> i64 { 50 }

// ============================================================================
// Summary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SleepSummaryParams {
    /// Start date (inclusive) - optional
    pub start_date: Option<String>,
    /// End date (inclusive) - optional
    pub end_date: Option<String>,
    /// Granularity: Daily, Weekly, Monthly (default Daily)
    pub granularity: Option<String>,
    /// Exclude check-ins without the metric instead of counting them as zero
    #[serde(default)]
    pub ignore_missing: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct HealthSummaryParams {
    /// Metric: heart_rate, systolic_bp, diastolic_bp, weight, sleep_hours, water_intake, mood, stress, steps
    pub metric: String,
    /// Start date (inclusive) - optional
    pub start_date: Option<String>,
    /// End date (inclusive) - optional
    pub end_date: Option<String>,
    /// Granularity: Daily, Weekly, Monthly (default Daily)
    pub granularity: Option<String>,
    /// Exclude check-ins without the metric instead of counting them as zero
    #[serde(default)]
    pub ignore_missing: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConsumptionSummaryParams {
    /// Filter by meal type (optional)
    pub meal_type: Option<String>,
    /// Start date (inclusive) - defaults to 30 days ago with end_date absent
    pub start_date: Option<String>,
    /// End date (inclusive) - defaults to today with start_date absent
    pub end_date: Option<String>,
    /// Granularity: Daily, Weekly, Monthly (default Daily)
    pub granularity: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BurnSummaryParams {
    /// Start date (inclusive) - optional
    pub start_date: Option<String>,
    /// End date (inclusive) - optional
    pub end_date: Option<String>,
    /// Granularity: Daily, Weekly, Monthly (default Daily)
    pub granularity: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

fn to_json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl FittrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the FitTrack service including build info, database status, and process information")]
    async fn fittrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        to_json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for the dashboard workflow. Call this when starting a tracking session or when unsure how to use the tools.")]
    fn dashboard_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(DASHBOARD_INSTRUCTIONS)]))
    }

    // --- Check-ins ---

    #[tool(description = "Record a daily health check-in. One row exists per date; recording again fills in or overwrites the provided metrics.")]
    fn record_checkin(&self, Parameters(p): Parameters<RecordCheckinParams>) -> Result<CallToolResult, McpError> {
        let source = match p.source.as_deref() {
            Some(s) => Some(CheckinSource::from_str(s).ok_or_else(|| {
                McpError::internal_error(format!("Invalid source: '{}'. Valid: manual, device", s), None)
            })?),
            None => None,
        };
        let data = HealthCheckinCreate {
            date: p.date,
            source,
            heart_rate: p.heart_rate,
            systolic_bp: p.systolic_bp,
            diastolic_bp: p.diastolic_bp,
            weight: p.weight,
            sleep_hours: p.sleep_hours,
            water_intake: p.water_intake,
            mood: p.mood,
            stress: p.stress,
            steps: p.steps,
        };
        let result = checkins::record_checkin(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get the check-in for a specific date")]
    fn get_checkin(&self, Parameters(p): Parameters<GetCheckinParams>) -> Result<CallToolResult, McpError> {
        let result = checkins::get_checkin(&self.database, &p.date).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(checkin) => to_json_result(&checkin),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Check-in not found", "date": "{}"}}"#,
                p.date
            ))])),
        }
    }

    #[tool(description = "List check-ins, optionally restricted to an inclusive date range")]
    fn list_checkins(&self, Parameters(p): Parameters<ListCheckinsParams>) -> Result<CallToolResult, McpError> {
        let result = checkins::list_checkins(&self.database, p.start_date.as_deref(), p.end_date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Delete a check-in by ID")]
    fn delete_checkin(&self, Parameters(p): Parameters<DeleteByIdParams>) -> Result<CallToolResult, McpError> {
        let result = checkins::delete_checkin(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Exercises ---

    #[tool(description = "Add an exercise to the catalog with its goal category, measurement, calorie burn, and intensity")]
    fn add_exercise(&self, Parameters(p): Parameters<AddExerciseParams>) -> Result<CallToolResult, McpError> {
        let result = exercises::add_exercise(
            &self.database,
            &p.name,
            &p.goal_category,
            &p.measurement_type,
            p.duration_minutes,
            p.reps,
            p.sets,
            p.calories_burned,
            &p.intensity,
            p.age_min,
            p.age_max,
        ).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "List catalog exercises, optionally filtered by goal category")]
    fn list_exercises(&self, Parameters(p): Parameters<ListExercisesParams>) -> Result<CallToolResult, McpError> {
        let result = exercises::list_exercises(&self.database, p.goal_category.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Delete an exercise from the catalog (its challenges are deleted too)")]
    fn delete_exercise(&self, Parameters(p): Parameters<DeleteByIdParams>) -> Result<CallToolResult, McpError> {
        let result = exercises::delete_exercise(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Challenges ---

    #[tool(description = "Create a challenge committing to an exercise on a Daily/Weekly/Monthly cadence for N occurrences")]
    fn create_challenge(&self, Parameters(p): Parameters<CreateChallengeParams>) -> Result<CallToolResult, McpError> {
        let result = challenges::create_challenge(&self.database, p.exercise_id, &p.cadence, p.occurrence_count)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "List open (not yet completed) challenges")]
    fn list_challenges(&self) -> Result<CallToolResult, McpError> {
        let result = challenges::list_challenges(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "List challenges with an occurrence due on a date (today by default), excluding ones already done that day or fully completed")]
    fn list_due_challenges(&self, Parameters(p): Parameters<ListDueChallengesParams>) -> Result<CallToolResult, McpError> {
        let result = challenges::list_due_challenges(&self.database, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Record a challenge occurrence (completed/uncompleted/skipped) for a date and roll the challenge's progress forward")]
    fn record_occurrence(&self, Parameters(p): Parameters<RecordOccurrenceParams>) -> Result<CallToolResult, McpError> {
        let result = challenges::record_occurrence(&self.database, p.challenge_id, &p.status, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Delete a challenge and its occurrences")]
    fn delete_challenge(&self, Parameters(p): Parameters<DeleteByIdParams>) -> Result<CallToolResult, McpError> {
        let result = challenges::delete_challenge(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Counts of completed and in-progress challenges per cadence")]
    fn achievement_summary(&self) -> Result<CallToolResult, McpError> {
        let result = challenges::achievement_summary(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Per-challenge progress against the expected pace for its cadence")]
    fn progress_summary(&self) -> Result<CallToolResult, McpError> {
        let result = challenges::progress_summary(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Food catalog and meals ---

    #[tool(description = "List the food categories")]
    fn list_food_categories(&self) -> Result<CallToolResult, McpError> {
        let result = meals::list_food_categories(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "List catalog food items, optionally within one category")]
    fn list_food_items(&self, Parameters(p): Parameters<ListFoodItemsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_food_items(&self.database, p.category_id).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "List the food measurement units")]
    fn list_food_units(&self) -> Result<CallToolResult, McpError> {
        let result = meals::list_food_units(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "List the portion sizes and their multipliers")]
    fn list_food_sizes(&self) -> Result<CallToolResult, McpError> {
        let result = meals::list_food_sizes(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Add a food category")]
    fn add_food_category(&self, Parameters(p): Parameters<AddFoodCategoryParams>) -> Result<CallToolResult, McpError> {
        let result = meals::add_food_category(&self.database, &p.name, p.description.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Add a portion size with its serving multiplier")]
    fn add_food_size(&self, Parameters(p): Parameters<AddFoodSizeParams>) -> Result<CallToolResult, McpError> {
        let result = meals::add_food_size(&self.database, &p.name, p.multiplier)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Add a food item to the catalog with its default serving and calorie value")]
    fn add_food_item(&self, Parameters(p): Parameters<AddFoodItemParams>) -> Result<CallToolResult, McpError> {
        let result = meals::add_food_item(
            &self.database,
            p.category_id,
            &p.name,
            p.default_serving_size,
            p.default_serving_unit_id,
            p.calories_per_default,
        ).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Add a food measurement unit (mass, volume, or count)")]
    fn add_food_unit(&self, Parameters(p): Parameters<AddFoodUnitParams>) -> Result<CallToolResult, McpError> {
        let result = meals::add_food_unit(&self.database, &p.name, &p.abbreviation, &p.unit_type)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Log a meal entry; calories are computed from the food item, quantity, and portion size")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let result = meals::log_meal(
            &self.database,
            &p.meal_type,
            p.food_item_id,
            p.size_id,
            p.quantity,
            p.logged_at.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "List logged meal entries, newest first")]
    fn list_meal_entries(&self, Parameters(p): Parameters<ListMealEntriesParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meal_entries(&self.database, p.meal_type.as_deref(), Some(p.limit))
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Delete a meal entry by ID")]
    fn delete_meal_entry(&self, Parameters(p): Parameters<DeleteByIdParams>) -> Result<CallToolResult, McpError> {
        let result = meals::delete_meal_entry(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Dashboard summaries ---

    #[tool(description = "Mean sleep hours per period (Daily/Weekly/Monthly buckets over an inclusive date window)")]
    fn sleep_summary(&self, Parameters(p): Parameters<SleepSummaryParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::sleep_summary(
            &self.database,
            p.start_date.as_deref(),
            p.end_date.as_deref(),
            p.granularity.as_deref(),
            p.ignore_missing,
        ).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Mean of any check-in metric per period (Daily/Weekly/Monthly buckets over an inclusive date window)")]
    fn health_summary(&self, Parameters(p): Parameters<HealthSummaryParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::health_summary(
            &self.database,
            &p.metric,
            p.start_date.as_deref(),
            p.end_date.as_deref(),
            p.granularity.as_deref(),
            p.ignore_missing,
        ).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Total calories consumed per period, optionally one meal type. Defaults to the last 30 days when no window is given.")]
    fn consumption_summary(&self, Parameters(p): Parameters<ConsumptionSummaryParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::consumption_summary(
            &self.database,
            p.meal_type.as_deref(),
            p.start_date.as_deref(),
            p.end_date.as_deref(),
            p.granularity.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Total calories burned by completed challenge occurrences per period")]
    fn burn_summary(&self, Parameters(p): Parameters<BurnSummaryParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::burn_summary(
            &self.database,
            p.start_date.as_deref(),
            p.end_date.as_deref(),
            p.granularity.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for FittrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fittrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("FitTrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "FitTrack - fitness, nutrition, and challenge tracking. \
                 IMPORTANT: Call dashboard_instructions when starting a session. \
                 Check-ins: record_checkin/get_checkin/list_checkins/delete_checkin. \
                 Exercises: add_exercise/list_exercises/delete_exercise. \
                 Challenges: create_challenge/list_challenges/list_due_challenges, \
                 record_occurrence, delete_challenge, achievement_summary, progress_summary. \
                 Food: list_food_categories/list_food_items/list_food_sizes, \
                 add_food_category/add_food_unit/add_food_item/add_food_size, \
                 log_meal/list_meal_entries/delete_meal_entry. \
                 Charts: sleep_summary, health_summary, consumption_summary, burn_summary - \
                 all take an inclusive date window and a Daily/Weekly/Monthly granularity."
                    .into(),
            ),
        }
    }
}
