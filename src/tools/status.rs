//! Service status tool
//!
//! Runtime status reporting: build info, database info, process info.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Workflow instructions returned by the dashboard_instructions tool
pub const DASHBOARD_INSTRUCTIONS: &str = r#"
# FitTrack Dashboard Workflow

## Recording data
- `record_checkin` once per day with whatever metrics you have
  (heart_rate, systolic_bp, diastolic_bp, weight, sleep_hours,
  water_intake, mood, stress, steps). Recording again on the same date
  fills in or overwrites the provided metrics.
- `log_meal` per food item eaten: pick a category (`list_food_categories`),
  an item (`list_food_items`), an optional portion size (`list_food_sizes`),
  and a quantity. Calories are computed from the catalog.
- `create_challenge` commits to an exercise on a Daily/Weekly/Monthly
  cadence for N occurrences; `list_due_challenges` shows what is due
  today; `record_occurrence` marks a day completed or skipped.

## Chart summaries
All summaries take an optional inclusive date window (start/end,
defaulting to the last 30 days where noted) and a granularity
(Daily, Weekly, Monthly). Weekly buckets follow ISO weeks.
- `sleep_summary` - mean sleep hours per period
- `health_summary` - mean of any check-in metric per period
- `consumption_summary` - total calories consumed per period,
  optionally one meal type
- `burn_summary` - total calories burned by completed occurrences per period

## Notes
- Dates use ISO format: YYYY-MM-DD
- Summaries average missing metric values as zero unless ignore_missing
  is set
"#;

/// Runtime status of the FitTrack service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
