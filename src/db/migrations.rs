//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("applied schema migration v1");
    }

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- HEALTH CHECK-INS
        -- One row per calendar date with optional metrics
        -- ============================================
        CREATE TABLE health_checkins (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL UNIQUE,           -- ISO date: "2025-01-09"
            source TEXT CHECK(source IN ('manual', 'device')) NOT NULL DEFAULT 'manual',
            heart_rate INTEGER,                  -- bpm
            systolic_bp INTEGER,                 -- mmHg
            diastolic_bp INTEGER,                -- mmHg
            weight REAL,                         -- lbs
            sleep_hours REAL,
            water_intake REAL,                   -- liters
            mood INTEGER,                        -- 1-10
            stress INTEGER,                      -- 1-10
            steps INTEGER,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_health_checkins_date ON health_checkins(date);

        -- ============================================
        -- EXERCISES
        -- Catalog of exercises with per-occurrence burn
        -- ============================================
        CREATE TABLE exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            goal_category TEXT CHECK(goal_category IN
                ('Weight Loss', 'Weight Gain', 'Build Muscle', 'Normal')) NOT NULL,
            measurement_type TEXT CHECK(measurement_type IN
                ('duration', 'reps_sets')) NOT NULL DEFAULT 'duration',
            duration_minutes INTEGER,
            reps INTEGER,
            sets INTEGER,
            calories_burned REAL NOT NULL,       -- per completed occurrence
            intensity TEXT CHECK(intensity IN ('Low', 'Moderate', 'High')) NOT NULL,
            age_min INTEGER NOT NULL DEFAULT 0,
            age_max INTEGER NOT NULL DEFAULT 120,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_exercises_goal ON exercises(goal_category);

        -- ============================================
        -- CHALLENGES
        -- A commitment to repeat an exercise on a cadence
        -- ============================================
        CREATE TABLE challenges (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
            cadence TEXT CHECK(cadence IN ('Daily', 'Weekly', 'Monthly')) NOT NULL,
            occurrence_count INTEGER NOT NULL DEFAULT 1,
            status TEXT CHECK(status IN
                ('inprogress', 'completed', 'uncompleted')) NOT NULL DEFAULT 'inprogress',
            progress_percent REAL NOT NULL DEFAULT 0.0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            end_date TEXT
        );

        CREATE INDEX idx_challenges_status ON challenges(status);

        -- ============================================
        -- CHALLENGE OCCURRENCES
        -- One row per challenge per date
        -- ============================================
        CREATE TABLE challenge_occurrences (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            challenge_id INTEGER NOT NULL REFERENCES challenges(id) ON DELETE CASCADE,
            date TEXT NOT NULL,                  -- ISO date
            status TEXT CHECK(status IN
                ('completed', 'uncompleted', 'skipped')) NOT NULL DEFAULT 'uncompleted',
            calories_burned REAL,                -- snapshot taken on completion
            UNIQUE(challenge_id, date)
        );

        CREATE INDEX idx_occurrences_date ON challenge_occurrences(date);

        -- ============================================
        -- FOOD CATALOG
        -- ============================================
        CREATE TABLE food_categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT
        );

        CREATE TABLE food_units (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,           -- e.g. "gram", "liter", "each"
            abbreviation TEXT NOT NULL,          -- e.g. "g", "l", "ea"
            unit_type TEXT CHECK(unit_type IN ('mass', 'volume', 'count')) NOT NULL
        );

        CREATE TABLE food_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id INTEGER NOT NULL REFERENCES food_categories(id),
            name TEXT NOT NULL UNIQUE,
            default_serving_size REAL NOT NULL,  -- e.g. 150 for a 150 g apple
            default_serving_unit_id INTEGER NOT NULL REFERENCES food_units(id),
            calories_per_default REAL NOT NULL   -- kcal for one default serving
        );

        CREATE INDEX idx_food_items_category ON food_items(category_id);

        CREATE TABLE food_sizes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,           -- "Small", "Medium", "Large"
            multiplier REAL NOT NULL             -- portion = multiplier x default serving
        );

        -- ============================================
        -- MEAL ENTRIES
        -- Logged food consumption with computed calories
        -- ============================================
        CREATE TABLE meal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            meal_type TEXT CHECK(meal_type IN ('breakfast', 'lunch', 'dinner')) NOT NULL,
            category_id INTEGER NOT NULL REFERENCES food_categories(id),
            food_item_id INTEGER NOT NULL REFERENCES food_items(id),
            size_id INTEGER REFERENCES food_sizes(id),
            quantity REAL NOT NULL,
            calories_consumed REAL NOT NULL,
            logged_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meal_entries_logged_at ON meal_entries(logged_at);
        CREATE INDEX idx_meal_entries_meal_type ON meal_entries(meal_type);
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_run_clean() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }
}
