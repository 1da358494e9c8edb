// ABOUTME: Database management with SQLite pool setup and schema migrations
// ABOUTME: Per-domain store managers live in sibling modules and share the pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Database Management
//!
//! This module owns the SQLite connection pool and the schema. Each domain
//! (preferences, history, routines, equipment, subscriptions, usage) gets a
//! small manager struct over the shared pool; routes and services depend on
//! managers, never on raw SQL.

mod equipment;
mod history;
mod preferences;
mod routines;
mod subscriptions;
mod usage;

pub use equipment::EquipmentManager;
pub use history::HistoryManager;
pub use preferences::PreferenceManager;
pub use routines::RoutineManager;
pub use subscriptions::{SubscriptionManager, SubscriptionUpsert};
pub use usage::UsageManager;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database manager owning the connection pool and schema migrations
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") && !in_memory {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        // An in-memory database exists per connection; the pool must stay on
        // a single one or later connections see an empty schema
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(&connection_options)
                .await?
        } else {
            SqlitePool::connect(&connection_options).await?
        };

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_preferences().await?;
        self.migrate_history().await?;
        self.migrate_routines().await?;
        self.migrate_equipment().await?;
        self.migrate_subscriptions().await?;
        self.migrate_usage().await?;
        Ok(())
    }

    async fn migrate_preferences(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_preferences (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL UNIQUE,
                primary_goal TEXT NOT NULL,
                experience_level TEXT NOT NULL,
                available_equipment TEXT NOT NULL DEFAULT '[]',
                preferred_workout_days INTEGER NOT NULL DEFAULT 3,
                workout_duration_minutes INTEGER NOT NULL DEFAULT 60,
                injury_considerations TEXT NOT NULL DEFAULT '[]',
                target_muscle_groups TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_history(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_history (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                raw_input TEXT NOT NULL,
                entry_type TEXT NOT NULL DEFAULT 'completion',
                exercise TEXT,
                weight REAL,
                sets INTEGER,
                reps INTEGER,
                intensity TEXT,
                mood TEXT,
                notes TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_history_user_created
             ON workout_history(user_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_routines(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_routines (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                workouts TEXT NOT NULL,
                analysis TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_routines_user ON workout_routines(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_equipment(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS equipment (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                quantity INTEGER NOT NULL CHECK (quantity >= 1),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_subscriptions(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS subscriptions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL UNIQUE,
                customer_id TEXT NOT NULL,
                subscription_id TEXT NOT NULL UNIQUE,
                status TEXT NOT NULL,
                price_id TEXT,
                current_period_end TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_usage(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_generations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                plan_name TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_generations_user_created
             ON workout_generations(user_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
