// ABOUTME: Entitlement gate deciding whether a user may generate another plan
// ABOUTME: Pro subscriptions are unlimited; free users get a rolling-window quota
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Entitlement Gate
//!
//! Policy: an active or trialing subscription grants unlimited generations.
//! Otherwise the user's `workout_generations` rows within a trailing 30-day
//! window are counted against the free-tier quota.
//!
//! Every lookup failure fails closed: errors propagate to the caller and the
//! request is denied, never silently granted.

use chrono::{Duration, Utc};

use crate::database::{SubscriptionManager, UsageManager};
use crate::errors::AppResult;

/// Free-tier generations per rolling window
pub const FREE_TIER_MONTHLY_GENERATIONS: u32 = 100;

/// Length of the rolling usage window, in days
pub const USAGE_WINDOW_DAYS: i64 = 30;

/// Decides whether a user may invoke plan generation
pub struct EntitlementGate {
    subscriptions: SubscriptionManager,
    usage: UsageManager,
}

impl EntitlementGate {
    /// Create a new entitlement gate
    #[must_use]
    pub const fn new(subscriptions: SubscriptionManager, usage: UsageManager) -> Self {
        Self {
            subscriptions,
            usage,
        }
    }

    /// Whether the user holds an active or trialing subscription
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription lookup fails (fail-closed)
    pub async fn is_pro(&self, user_id: &str) -> AppResult<bool> {
        Ok(self
            .subscriptions
            .get_for_user(user_id)
            .await?
            .is_some_and(|record| record.is_pro()))
    }

    /// Subscription status string for the status endpoint ("free" when no
    /// row exists)
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription lookup fails
    pub async fn status(&self, user_id: &str) -> AppResult<String> {
        Ok(self
            .subscriptions
            .get_for_user(user_id)
            .await?
            .map_or_else(|| "free".to_owned(), |record| record.status))
    }

    /// Whether the user may generate another plan right now
    ///
    /// # Errors
    ///
    /// Returns an error if any lookup fails (fail-closed: the caller denies)
    pub async fn can_generate(&self, user_id: &str) -> AppResult<bool> {
        if self.is_pro(user_id).await? {
            return Ok(true);
        }

        let count = self
            .usage
            .count_since(user_id, Self::window_start())
            .await?;

        Ok(count < FREE_TIER_MONTHLY_GENERATIONS)
    }

    /// Remaining free-tier generations; `None` means unlimited
    ///
    /// # Errors
    ///
    /// Returns an error if any lookup fails
    pub async fn remaining_generations(&self, user_id: &str) -> AppResult<Option<u32>> {
        if self.is_pro(user_id).await? {
            return Ok(None);
        }

        let count = self
            .usage
            .count_since(user_id, Self::window_start())
            .await?;

        Ok(Some(FREE_TIER_MONTHLY_GENERATIONS.saturating_sub(count)))
    }

    fn window_start() -> chrono::DateTime<Utc> {
        Utc::now() - Duration::days(USAGE_WINDOW_DAYS)
    }
}
