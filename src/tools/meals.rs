//! Meal logging tools
//!
//! Food catalog browsing and meal entry logging.

use serde::Serialize;

use crate::db::Database;
use crate::models::{
    FoodCategory, FoodItem, FoodItemCreate, FoodSize, FoodUnit, MealEntry, MealEntryCreate,
    MealType, UnitType,
};

/// Response for list_food_categories
#[derive(Debug, Serialize)]
pub struct FoodCategoriesResponse {
    pub categories: Vec<FoodCategory>,
    pub total: usize,
}

/// Response for list_food_items
#[derive(Debug, Serialize)]
pub struct FoodItemsResponse {
    pub items: Vec<FoodItemView>,
    pub total: usize,
}

/// A food item joined to its unit abbreviation
#[derive(Debug, Serialize)]
pub struct FoodItemView {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub default_serving: String,
    pub calories_per_default: f64,
}

/// Response for list_food_units
#[derive(Debug, Serialize)]
pub struct FoodUnitsResponse {
    pub units: Vec<FoodUnit>,
    pub total: usize,
}

/// Response for list_food_sizes
#[derive(Debug, Serialize)]
pub struct FoodSizesResponse {
    pub sizes: Vec<FoodSize>,
    pub total: usize,
}

/// Response for log_meal
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub id: i64,
    pub meal_type: String,
    pub food_name: String,
    pub quantity: f64,
    pub calories_consumed: f64,
    pub logged_at: String,
}

/// Response for list_meal_entries
#[derive(Debug, Serialize)]
pub struct MealEntriesResponse {
    pub entries: Vec<MealEntry>,
    pub total: usize,
}

/// List the food categories
pub fn list_food_categories(db: &Database) -> Result<FoodCategoriesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let categories =
        FoodCategory::list(&conn).map_err(|e| format!("Failed to list categories: {}", e))?;
    let total = categories.len();

    Ok(FoodCategoriesResponse { categories, total })
}

/// List food items, optionally one category
pub fn list_food_items(
    db: &Database,
    category_id: Option<i64>,
) -> Result<FoodItemsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let items = FoodItem::list(&conn, category_id)
        .map_err(|e| format!("Failed to list food items: {}", e))?;

    let mut views = Vec::with_capacity(items.len());
    for item in &items {
        let abbreviation = FoodUnit::get_by_id(&conn, item.default_serving_unit_id)
            .map_err(|e| format!("Database error: {}", e))?
            .map(|u| u.abbreviation)
            .unwrap_or_default();
        views.push(FoodItemView {
            id: item.id,
            category_id: item.category_id,
            name: item.name.clone(),
            default_serving: format!("{} {}", item.default_serving_size, abbreviation),
            calories_per_default: item.calories_per_default,
        });
    }

    let total = views.len();
    Ok(FoodItemsResponse {
        items: views,
        total,
    })
}

/// List the measurement units
pub fn list_food_units(db: &Database) -> Result<FoodUnitsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let units = FoodUnit::list(&conn).map_err(|e| format!("Failed to list units: {}", e))?;
    let total = units.len();

    Ok(FoodUnitsResponse { units, total })
}

/// List the portion sizes
pub fn list_food_sizes(db: &Database) -> Result<FoodSizesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let sizes = FoodSize::list(&conn).map_err(|e| format!("Failed to list sizes: {}", e))?;
    let total = sizes.len();

    Ok(FoodSizesResponse { sizes, total })
}

/// Add a food category
pub fn add_food_category(
    db: &Database,
    name: &str,
    description: Option<&str>,
) -> Result<FoodCategory, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    FoodCategory::create(&conn, name, description)
        .map_err(|e| format!("Failed to create category: {}", e))
}

/// Add a portion size with its multiplier
pub fn add_food_size(db: &Database, name: &str, multiplier: f64) -> Result<FoodSize, String> {
    if multiplier <= 0.0 {
        return Err("multiplier must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    FoodSize::create(&conn, name, multiplier)
        .map_err(|e| format!("Failed to create size: {}", e))
}

/// Add a food item to the catalog
pub fn add_food_item(
    db: &Database,
    category_id: i64,
    name: &str,
    default_serving_size: f64,
    default_serving_unit_id: i64,
    calories_per_default: f64,
) -> Result<FoodItem, String> {
    if default_serving_size <= 0.0 {
        return Err("default_serving_size must be greater than 0".to_string());
    }
    if calories_per_default < 0.0 {
        return Err("calories_per_default must not be negative".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if FoodCategory::get_by_id(&conn, category_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Food category not found with id: {}", category_id));
    }
    if FoodUnit::get_by_id(&conn, default_serving_unit_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!(
            "Food unit not found with id: {}",
            default_serving_unit_id
        ));
    }

    let data = FoodItemCreate {
        category_id,
        name: name.to_string(),
        default_serving_size,
        default_serving_unit_id,
        calories_per_default,
    };

    FoodItem::create(&conn, &data).map_err(|e| format!("Failed to create food item: {}", e))
}

/// Add a measurement unit
pub fn add_food_unit(
    db: &Database,
    name: &str,
    abbreviation: &str,
    unit_type: &str,
) -> Result<FoodUnit, String> {
    let unit_type = UnitType::from_str(unit_type)
        .ok_or_else(|| format!("Invalid unit type: '{}'. Valid: mass, volume, count", unit_type))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    FoodUnit::create(&conn, name, abbreviation, unit_type)
        .map_err(|e| format!("Failed to create unit: {}", e))
}

/// Log a meal entry; calories come from the catalog
pub fn log_meal(
    db: &Database,
    meal_type: &str,
    food_item_id: i64,
    size_id: Option<i64>,
    quantity: f64,
    logged_at: Option<&str>,
) -> Result<LogMealResponse, String> {
    let meal_type = MealType::from_str(meal_type).ok_or_else(|| {
        format!(
            "Invalid meal type: '{}'. Valid: breakfast, lunch, dinner",
            meal_type
        )
    })?;

    if quantity <= 0.0 {
        return Err("quantity must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let item = FoodItem::get_by_id(&conn, food_item_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Food item not found with id: {}", food_item_id))?;

    if let Some(size_id) = size_id {
        if FoodSize::get_by_id(&conn, size_id)
            .map_err(|e| format!("Database error: {}", e))?
            .is_none()
        {
            return Err(format!("Food size not found with id: {}", size_id));
        }
    }

    let data = MealEntryCreate {
        meal_type,
        category_id: item.category_id,
        food_item_id,
        size_id,
        quantity,
        logged_at: logged_at.map(|s| s.to_string()),
    };

    let entry =
        MealEntry::create(&conn, &data).map_err(|e| format!("Failed to log meal: {}", e))?;

    Ok(LogMealResponse {
        id: entry.id,
        meal_type: entry.meal_type.as_str().to_string(),
        food_name: item.name,
        quantity: entry.quantity,
        calories_consumed: entry.calories_consumed,
        logged_at: entry.logged_at,
    })
}

/// List logged meal entries, newest first
pub fn list_meal_entries(
    db: &Database,
    meal_type: Option<&str>,
    limit: Option<i64>,
) -> Result<MealEntriesResponse, String> {
    let meal_type = match meal_type {
        Some(mt) => Some(
            MealType::from_str(mt).ok_or_else(|| format!("Invalid meal type: '{}'", mt))?,
        ),
        None => None,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = MealEntry::list(&conn, meal_type, limit)
        .map_err(|e| format!("Failed to list meal entries: {}", e))?;
    let total = entries.len();

    Ok(MealEntriesResponse { entries, total })
}

/// Delete a meal entry
pub fn delete_meal_entry(
    db: &Database,
    id: i64,
) -> Result<super::checkins::DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted =
        MealEntry::delete(&conn, id).map_err(|e| format!("Failed to delete entry: {}", e))?;
    if !deleted {
        return Err(format!("Meal entry not found with id: {}", id));
    }

    Ok(super::checkins::DeleteResponse {
        success: true,
        deleted_id: id,
    })
}
