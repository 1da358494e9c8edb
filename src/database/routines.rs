// ABOUTME: Database operations for saved workout routines
// ABOUTME: User-scoped CRUD; workouts and analysis persisted as JSON columns
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{AppError, AppResult};
use crate::models::{PlanAnalysis, Routine, WorkoutMap, WorkoutPlan};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Routine store operations
pub struct RoutineManager {
    pool: SqlitePool,
}

impl RoutineManager {
    /// Create a new routine manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a generated plan as a named routine
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails
    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        plan: &WorkoutPlan,
    ) -> AppResult<Routine> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let workouts_json = serde_json::to_string(&plan.workouts)
            .map_err(|e| AppError::internal(format!("Failed to encode workouts: {e}")))?;
        let analysis_json = plan
            .analysis
            .as_ref()
            .map(|a| {
                serde_json::to_string(a)
                    .map_err(|e| AppError::internal(format!("Failed to encode analysis: {e}")))
            })
            .transpose()?;

        sqlx::query(
            r"
            INSERT INTO workout_routines (
                id, user_id, name, description, workouts, analysis, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ",
        )
        .bind(&id)
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(&workouts_json)
        .bind(analysis_json.as_deref())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save routine: {e}")))?;

        Ok(Routine {
            id,
            user_id: user_id.to_owned(),
            name: name.to_owned(),
            description: description.to_owned(),
            workouts: plan.workouts.clone(),
            analysis: plan.analysis.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// List a user's routines, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<Routine>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, description, workouts, analysis, created_at, updated_at
            FROM workout_routines
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch routines: {e}")))?;

        Ok(rows.into_iter().map(row_to_routine).collect())
    }

    /// Fetch one routine by id, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, user_id: &str, routine_id: &str) -> AppResult<Option<Routine>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, name, description, workouts, analysis, created_at, updated_at
            FROM workout_routines
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(routine_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch routine: {e}")))?;

        Ok(row.map(row_to_routine))
    }

    /// Delete one routine by id, scoped to its owner
    ///
    /// Returns `true` when a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, user_id: &str, routine_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM workout_routines
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(routine_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete routine: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_routine(r: SqliteRow) -> Routine {
    let workouts: WorkoutMap =
        serde_json::from_str(&r.get::<String, _>("workouts")).unwrap_or_default();
    let analysis: Option<PlanAnalysis> = r
        .get::<Option<String>, _>("analysis")
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok());

    Routine {
        id: r.get("id"),
        user_id: r.get("user_id"),
        name: r.get("name"),
        description: r.get("description"),
        workouts,
        analysis,
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}
