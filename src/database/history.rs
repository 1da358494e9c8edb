// ABOUTME: Database operations for the append-only workout history log
// ABOUTME: Rows are created per free-text submission and never mutated or deleted
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{AppError, AppResult};
use crate::models::{HistoryEntry, Intensity, StatsType, StatsUpdate};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// History store operations
pub struct HistoryManager {
    pool: SqlitePool,
}

impl HistoryManager {
    /// Create a new history manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one history row with a server-assigned timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn append(
        &self,
        user_id: &str,
        raw_input: &str,
        stats: &StatsUpdate,
    ) -> AppResult<HistoryEntry> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO workout_history (
                id, user_id, raw_input, entry_type, exercise, weight, sets, reps,
                intensity, mood, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(&id)
        .bind(user_id)
        .bind(raw_input)
        .bind(stats.entry_type.as_str())
        .bind(stats.exercise.as_deref())
        .bind(stats.weight)
        .bind(stats.sets.map(i64::from))
        .bind(stats.reps.map(i64::from))
        .bind(stats.intensity.map(intensity_to_str))
        .bind(stats.mood.as_deref())
        .bind(stats.notes.as_deref())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save workout stats: {e}")))?;

        Ok(HistoryEntry {
            id,
            user_id: user_id.to_owned(),
            raw_input: raw_input.to_owned(),
            stats: stats.clone(),
            created_at: now,
        })
    }

    /// List the most recent history entries for a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_recent(&self, user_id: &str, limit: i64) -> AppResult<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, raw_input, entry_type, exercise, weight, sets, reps,
                   intensity, mood, notes, created_at
            FROM workout_history
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch workout history: {e}")))?;

        Ok(rows.into_iter().map(row_to_entry).collect())
    }
}

fn row_to_entry(r: SqliteRow) -> HistoryEntry {
    HistoryEntry {
        id: r.get("id"),
        user_id: r.get("user_id"),
        raw_input: r.get("raw_input"),
        stats: StatsUpdate {
            entry_type: parse_entry_type(&r.get::<String, _>("entry_type")),
            exercise: r.get("exercise"),
            weight: r.get("weight"),
            sets: r.get::<Option<i64>, _>("sets").map(|v| v as u32),
            reps: r.get::<Option<i64>, _>("reps").map(|v| v as u32),
            intensity: r
                .get::<Option<String>, _>("intensity")
                .as_deref()
                .and_then(parse_intensity),
            mood: r.get("mood"),
            notes: r.get("notes"),
        },
        created_at: r.get("created_at"),
    }
}

fn parse_entry_type(raw: &str) -> StatsType {
    match raw {
        "intention" => StatsType::Intention,
        _ => StatsType::Completion,
    }
}

const fn intensity_to_str(intensity: Intensity) -> &'static str {
    match intensity {
        Intensity::Low => "low",
        Intensity::Medium => "medium",
        Intensity::High => "high",
    }
}

fn parse_intensity(raw: &str) -> Option<Intensity> {
    match raw {
        "low" => Some(Intensity::Low),
        "medium" => Some(Intensity::Medium),
        "high" => Some(Intensity::High),
        _ => None,
    }
}
