// ABOUTME: Database operations for user fitness preferences
// ABOUTME: One row per user, upserted on save, JSON-encoded list columns
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{AppError, AppResult};
use crate::models::Preferences;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Preference store operations
pub struct PreferenceManager {
    pool: SqlitePool,
}

impl PreferenceManager {
    /// Create a new preference manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch a user's preferences, if a row exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, user_id: &str) -> AppResult<Option<Preferences>> {
        let row = sqlx::query(
            r"
            SELECT user_id, primary_goal, experience_level, available_equipment,
                   preferred_workout_days, workout_duration_minutes,
                   injury_considerations, target_muscle_groups
            FROM user_preferences
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch preferences: {e}")))?;

        Ok(row.map(|r| Preferences {
            user_id: r.get("user_id"),
            primary_goal: r.get("primary_goal"),
            experience_level: r.get("experience_level"),
            available_equipment: decode_list(&r.get::<String, _>("available_equipment")),
            preferred_workout_days: r.get::<i64, _>("preferred_workout_days") as u32,
            workout_duration_minutes: r.get::<i64, _>("workout_duration_minutes") as u32,
            injury_considerations: decode_list(&r.get::<String, _>("injury_considerations")),
            target_muscle_groups: decode_list(&r.get::<String, _>("target_muscle_groups")),
        }))
    }

    /// Create or replace a user's preferences row
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn upsert(&self, preferences: &Preferences) -> AppResult<()> {
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO user_preferences (
                id, user_id, primary_goal, experience_level, available_equipment,
                preferred_workout_days, workout_duration_minutes,
                injury_considerations, target_muscle_groups, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            ON CONFLICT(user_id) DO UPDATE SET
                primary_goal = excluded.primary_goal,
                experience_level = excluded.experience_level,
                available_equipment = excluded.available_equipment,
                preferred_workout_days = excluded.preferred_workout_days,
                workout_duration_minutes = excluded.workout_duration_minutes,
                injury_considerations = excluded.injury_considerations,
                target_muscle_groups = excluded.target_muscle_groups,
                updated_at = excluded.updated_at
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&preferences.user_id)
        .bind(&preferences.primary_goal)
        .bind(&preferences.experience_level)
        .bind(encode_list(&preferences.available_equipment))
        .bind(i64::from(preferences.preferred_workout_days))
        .bind(i64::from(preferences.workout_duration_minutes))
        .bind(encode_list(&preferences.injury_considerations))
        .bind(encode_list(&preferences.target_muscle_groups))
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save preferences: {e}")))?;

        Ok(())
    }
}

fn encode_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_owned())
}

fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}
