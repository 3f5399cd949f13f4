//! Health check-in tools
//!
//! Recording and listing daily health check-ins.

use serde::Serialize;

use crate::db::Database;
use crate::models::{HealthCheckin, HealthCheckinCreate};

/// Response for record_checkin
#[derive(Debug, Serialize)]
pub struct RecordCheckinResponse {
    pub id: i64,
    pub date: String,
    pub source: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Response for list_checkins
#[derive(Debug, Serialize)]
pub struct ListCheckinsResponse {
    pub checkins: Vec<HealthCheckin>,
    pub total: usize,
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Record a daily check-in (one row per date; repeat calls fill in metrics)
pub fn record_checkin(
    db: &Database,
    data: HealthCheckinCreate,
) -> Result<RecordCheckinResponse, String> {
    if let Some(ref date) = data.date {
        if crate::analytics::dates::parse_date(date).is_none() {
            return Err(format!("Invalid date: '{}'. Expected YYYY-MM-DD", date));
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let checkin = HealthCheckin::record(&conn, &data)
        .map_err(|e| format!("Failed to record check-in: {}", e))?;

    Ok(RecordCheckinResponse {
        id: checkin.id,
        date: checkin.date,
        source: checkin.source.as_str().to_string(),
        created_at: checkin.created_at,
        updated_at: checkin.updated_at,
    })
}

/// Get the check-in for a date
pub fn get_checkin(db: &Database, date: &str) -> Result<Option<HealthCheckin>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    HealthCheckin::get_by_date(&conn, date)
        .map_err(|e| format!("Failed to get check-in: {}", e))
}

/// List check-ins, optionally restricted to an inclusive date range
pub fn list_checkins(
    db: &Database,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<ListCheckinsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let checkins = HealthCheckin::list(&conn, start_date, end_date)
        .map_err(|e| format!("Failed to list check-ins: {}", e))?;

    let total = checkins.len();
    Ok(ListCheckinsResponse { checkins, total })
}

/// Delete a check-in
pub fn delete_checkin(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let existing = HealthCheckin::get_by_id(&conn, id)
        .map_err(|e| format!("Database error: {}", e))?;

    if existing.is_none() {
        return Err(format!("Check-in not found with id: {}", id));
    }

    HealthCheckin::delete(&conn, id)
        .map_err(|e| format!("Failed to delete check-in: {}", e))?;

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}
