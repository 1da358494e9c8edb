// ABOUTME: Database operations for mirrored payment-processor subscription state
// ABOUTME: Rows are written only by the webhook handler, keyed by subscription id
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{AppError, AppResult};
use crate::models::SubscriptionRecord;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Fields carried by a subscription upsert
#[derive(Debug, Clone)]
pub struct SubscriptionUpsert<'a> {
    /// Owning user
    pub user_id: &'a str,
    /// Payment processor customer id
    pub customer_id: &'a str,
    /// Payment processor subscription id
    pub subscription_id: &'a str,
    /// Status as reported by the processor
    pub status: &'a str,
    /// Price/plan identifier
    pub price_id: Option<&'a str>,
    /// End of the current billing period (RFC 3339)
    pub current_period_end: Option<String>,
}

/// Subscription store operations
pub struct SubscriptionManager {
    pool: SqlitePool,
}

impl SubscriptionManager {
    /// Create a new subscription manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch the subscription row for a user, if one exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_for_user(&self, user_id: &str) -> AppResult<Option<SubscriptionRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, customer_id, subscription_id, status, price_id,
                   current_period_end, created_at, updated_at
            FROM subscriptions
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch subscription: {e}")))?;

        Ok(row.map(row_to_record))
    }

    /// Create or update a subscription row keyed by the processor's
    /// subscription id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn upsert(&self, upsert: SubscriptionUpsert<'_>) -> AppResult<()> {
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO subscriptions (
                id, user_id, customer_id, subscription_id, status, price_id,
                current_period_end, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT(subscription_id) DO UPDATE SET
                status = excluded.status,
                price_id = excluded.price_id,
                current_period_end = excluded.current_period_end,
                updated_at = excluded.updated_at
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(upsert.user_id)
        .bind(upsert.customer_id)
        .bind(upsert.subscription_id)
        .bind(upsert.status)
        .bind(upsert.price_id)
        .bind(upsert.current_period_end.as_deref())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert subscription: {e}")))?;

        Ok(())
    }

    /// Update the status of an existing row by subscription id
    ///
    /// Returns `true` when a row was updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update_status(&self, subscription_id: &str, status: &str) -> AppResult<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r"
            UPDATE subscriptions
            SET status = $1, updated_at = $2
            WHERE subscription_id = $3
            ",
        )
        .bind(status)
        .bind(&now)
        .bind(subscription_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update subscription: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a subscription row by the processor's subscription id
    ///
    /// Returns `true` when a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete_by_subscription_id(&self, subscription_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM subscriptions
            WHERE subscription_id = $1
            ",
        )
        .bind(subscription_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete subscription: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_record(r: SqliteRow) -> SubscriptionRecord {
    SubscriptionRecord {
        id: r.get("id"),
        user_id: r.get("user_id"),
        customer_id: r.get("customer_id"),
        subscription_id: r.get("subscription_id"),
        status: r.get("status"),
        price_id: r.get("price_id"),
        current_period_end: r.get("current_period_end"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}
