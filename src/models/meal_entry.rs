//! Meal entry model
//!
//! Logged food consumption. Calories are computed at logging time from the
//! food item's default-serving calories, the quantity, and the optional
//! portion-size multiplier.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::food::{FoodItem, FoodSize};

/// Meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            _ => None,
        }
    }
}

/// Calories for a logged entry: default-serving kcal times quantity times
/// the portion multiplier, rounded to 2 decimal places.
pub fn calories_for(calories_per_default: f64, quantity: f64, multiplier: Option<f64>) -> f64 {
    let total = calories_per_default * quantity * multiplier.unwrap_or(1.0);
    (total * 100.0).round() / 100.0
}

/// A logged meal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: i64,
    pub meal_type: MealType,
    pub category_id: i64,
    pub food_item_id: i64,
    pub size_id: Option<i64>,
    pub quantity: f64,
    pub calories_consumed: f64,
    pub logged_at: String,
}

/// Data for logging a meal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntryCreate {
    pub meal_type: MealType,
    pub category_id: i64,
    pub food_item_id: i64,
    pub size_id: Option<i64>,
    pub quantity: f64,
    pub logged_at: Option<String>, // defaults to now
}

impl MealEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type_str: String = row.get("meal_type")?;

        Ok(Self {
            id: row.get("id")?,
            meal_type: MealType::from_str(&meal_type_str).unwrap_or(MealType::Breakfast),
            category_id: row.get("category_id")?,
            food_item_id: row.get("food_item_id")?,
            size_id: row.get("size_id")?,
            quantity: row.get("quantity")?,
            calories_consumed: row.get("calories_consumed")?,
            logged_at: row.get("logged_at")?,
        })
    }

    /// Log a meal entry, computing its calories from the catalog
    pub fn create(conn: &Connection, data: &MealEntryCreate) -> DbResult<Self> {
        let item = FoodItem::get_by_id(conn, data.food_item_id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))?;

        let multiplier = match data.size_id {
            Some(size_id) => FoodSize::get_by_id(conn, size_id)?.map(|s| s.multiplier),
            None => None,
        };

        let calories = calories_for(item.calories_per_default, data.quantity, multiplier);
        let logged_at = data.logged_at.clone().unwrap_or_else(|| {
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
        });

        conn.execute(
            r#"
            INSERT INTO meal_entries (
                meal_type, category_id, food_item_id, size_id,
                quantity, calories_consumed, logged_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.meal_type.as_str(),
                data.category_id,
                data.food_item_id,
                data.size_id,
                data.quantity,
                calories,
                logged_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a meal entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List entries ordered by logged time, optionally filtered by meal type
    pub fn list(
        conn: &Connection,
        meal_type: Option<MealType>,
        limit: Option<i64>,
    ) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM meal_entries WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(mt) = meal_type {
            sql.push_str(&format!(" AND meal_type = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(mt.as_str().to_string()));
        }

        sql.push_str(" ORDER BY logged_at DESC");

        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        let entries = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Entries ordered by logged time ascending, optionally filtered by meal
    /// type. Feeds the consumption chart.
    pub fn list_for_summary(
        conn: &Connection,
        meal_type: Option<MealType>,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = match meal_type {
            Some(_) => conn.prepare(
                "SELECT * FROM meal_entries WHERE meal_type = ?1 ORDER BY logged_at ASC",
            )?,
            None => conn.prepare("SELECT * FROM meal_entries ORDER BY logged_at ASC")?,
        };

        let entries = match meal_type {
            Some(mt) => stmt
                .query_map([mt.as_str()], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(entries)
    }

    /// Delete a meal entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calories_default_multiplier() {
        assert_eq!(calories_for(95.0, 2.0, None), 190.0);
    }

    #[test]
    fn test_calories_with_size_multiplier() {
        // small portion: half the default serving
        assert_eq!(calories_for(95.0, 2.0, Some(0.5)), 95.0);
    }

    #[test]
    fn test_calories_rounded_to_cents() {
        assert_eq!(calories_for(33.33, 1.5, None), 50.0);
        assert_eq!(calories_for(10.0, 0.333, None), 3.33);
    }
}
