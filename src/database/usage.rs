// ABOUTME: Database operations for generation usage counters
// ABOUTME: One row per successful plan generation, counted over a rolling window
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Usage counter operations backing the entitlement gate
pub struct UsageManager {
    pool: SqlitePool,
}

impl UsageManager {
    /// Create a new usage manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record one successful plan generation
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn record(&self, user_id: &str, plan_name: Option<&str>) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO workout_generations (id, user_id, plan_name, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(plan_name)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to record generation: {e}")))?;

        Ok(())
    }

    /// Count a user's generations since the given cutoff
    ///
    /// RFC 3339 strings with a fixed UTC offset compare correctly as text, so
    /// the window predicate stays in SQL.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn count_since(&self, user_id: &str, cutoff: DateTime<Utc>) -> AppResult<u32> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS generation_count
            FROM workout_generations
            WHERE user_id = $1 AND created_at >= $2
            ",
        )
        .bind(user_id)
        .bind(cutoff.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count generations: {e}")))?;

        Ok(row.get::<i64, _>("generation_count") as u32)
    }
}
