//! Food catalog models
//!
//! Categories, measurement units, catalog food items with a default serving
//! and its calorie value, and named portion sizes with multipliers.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A food category ("Fruits", "Dairy", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl FoodCategory {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
        })
    }

    pub fn create(conn: &Connection, name: &str, description: Option<&str>) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO food_categories (name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_categories WHERE id = ?1")?;
        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_categories ORDER BY name")?;
        let categories = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

/// Unit kind for food measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Mass,
    Volume,
    Count,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Mass => "mass",
            UnitType::Volume => "volume",
            UnitType::Count => "count",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mass" => Some(UnitType::Mass),
            "volume" => Some(UnitType::Volume),
            "count" => Some(UnitType::Count),
            _ => None,
        }
    }
}

/// A measurement unit ("gram"/"g", "liter"/"l", "each"/"ea")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodUnit {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
    pub unit_type: UnitType,
}

impl FoodUnit {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let unit_type_str: String = row.get("unit_type")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            abbreviation: row.get("abbreviation")?,
            unit_type: UnitType::from_str(&unit_type_str).unwrap_or(UnitType::Mass),
        })
    }

    pub fn create(
        conn: &Connection,
        name: &str,
        abbreviation: &str,
        unit_type: UnitType,
    ) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO food_units (name, abbreviation, unit_type) VALUES (?1, ?2, ?3)",
            params![name, abbreviation, unit_type.as_str()],
        )?;
        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_units WHERE id = ?1")?;
        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(unit) => Ok(Some(unit)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_units ORDER BY name")?;
        let units = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(units)
    }
}

/// A catalog food item with its default serving and calorie value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub default_serving_size: f64,
    pub default_serving_unit_id: i64,
    pub calories_per_default: f64,
}

/// Data for adding a food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemCreate {
    pub category_id: i64,
    pub name: String,
    pub default_serving_size: f64,
    pub default_serving_unit_id: i64,
    pub calories_per_default: f64,
}

impl FoodItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            category_id: row.get("category_id")?,
            name: row.get("name")?,
            default_serving_size: row.get("default_serving_size")?,
            default_serving_unit_id: row.get("default_serving_unit_id")?,
            calories_per_default: row.get("calories_per_default")?,
        })
    }

    pub fn create(conn: &Connection, data: &FoodItemCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_items (
                category_id, name, default_serving_size,
                default_serving_unit_id, calories_per_default
            )
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.category_id,
                data.name,
                data.default_serving_size,
                data.default_serving_unit_id,
                data.calories_per_default,
            ],
        )?;
        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_items WHERE id = ?1")?;
        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List food items, optionally restricted to a category
    pub fn list(conn: &Connection, category_id: Option<i64>) -> DbResult<Vec<Self>> {
        let mut stmt = match category_id {
            Some(_) => conn.prepare(
                "SELECT * FROM food_items WHERE category_id = ?1 ORDER BY name",
            )?,
            None => conn.prepare("SELECT * FROM food_items ORDER BY name")?,
        };

        let items = match category_id {
            Some(cat) => stmt
                .query_map([cat], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(items)
    }
}

/// A named portion size ("Small" = 0.5x, "Large" = 1.0x)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSize {
    pub id: i64,
    pub name: String,
    pub multiplier: f64,
}

impl FoodSize {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            multiplier: row.get("multiplier")?,
        })
    }

    pub fn create(conn: &Connection, name: &str, multiplier: f64) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO food_sizes (name, multiplier) VALUES (?1, ?2)",
            params![name, multiplier],
        )?;
        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_sizes WHERE id = ?1")?;
        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(size) => Ok(Some(size)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_sizes ORDER BY multiplier")?;
        let sizes = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sizes)
    }
}
