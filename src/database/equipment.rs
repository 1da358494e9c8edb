// ABOUTME: Database operations for user-managed equipment items
// ABOUTME: Quantity is validated to be at least 1 before any write
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{AppError, AppResult};
use crate::models::Equipment;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Equipment store operations
pub struct EquipmentManager {
    pool: SqlitePool,
}

impl EquipmentManager {
    /// Create a new equipment manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's equipment items
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, quantity
            FROM equipment
            WHERE user_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch equipment: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|r| Equipment {
                id: r.get("id"),
                name: r.get("name"),
                quantity: r.get::<i64, _>("quantity") as u32,
            })
            .collect())
    }

    /// Add an equipment item
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is zero or the database operation
    /// fails
    pub async fn add(&self, user_id: &str, name: &str, quantity: u32) -> AppResult<Equipment> {
        if quantity < 1 {
            return Err(AppError::invalid_input("Equipment quantity must be at least 1"));
        }
        if name.trim().is_empty() {
            return Err(AppError::invalid_input("Equipment name cannot be empty"));
        }

        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO equipment (id, user_id, name, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ",
        )
        .bind(&id)
        .bind(user_id)
        .bind(name)
        .bind(i64::from(quantity))
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add equipment: {e}")))?;

        Ok(Equipment {
            id,
            name: name.to_owned(),
            quantity,
        })
    }

    /// Delete one equipment item by id, scoped to its owner
    ///
    /// Returns `true` when a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, user_id: &str, equipment_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM equipment
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(equipment_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete equipment: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
