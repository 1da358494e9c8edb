// ABOUTME: Subscription status and generation-limit route handlers
// ABOUTME: POST /subscription/check-limit and /subscription/status over the entitlement gate
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription routes

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Request carrying just the user id
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdRequest {
    /// Requesting user
    #[serde(default)]
    pub user_id: Option<String>,
}

impl UserIdRequest {
    fn require_user_id(self) -> Result<String, AppError> {
        self.user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("userId"))
    }
}

/// Response for the limit check
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckLimitResponse {
    /// Whether the user may generate another plan
    pub can_generate: bool,
}

/// Response for the status endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    /// Whether the user holds an active or trialing subscription
    pub is_pro: bool,
    /// Raw subscription status ("free" when no record exists)
    pub status: String,
    /// Remaining free-tier generations; omitted for pro users
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_generations: Option<u32>,
}

/// Subscription routes handler
pub struct SubscriptionRoutes;

impl SubscriptionRoutes {
    /// Create the subscription routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/subscription/check-limit", post(Self::check_limit))
            .route("/subscription/status", post(Self::status))
            .with_state(resources)
    }

    /// Whether the user may generate another plan this period
    ///
    /// Lookup failures propagate as 500 and the client treats the request as
    /// denied; the gate never fails open.
    async fn check_limit(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<UserIdRequest>,
    ) -> Result<Json<CheckLimitResponse>, AppError> {
        let user_id = request.require_user_id()?;

        let can_generate = resources.entitlement_gate().can_generate(&user_id).await?;

        Ok(Json(CheckLimitResponse { can_generate }))
    }

    /// Subscription status plus remaining free-tier generations
    async fn status(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<UserIdRequest>,
    ) -> Result<Json<SubscriptionStatusResponse>, AppError> {
        let user_id = request.require_user_id()?;
        let gate = resources.entitlement_gate();

        let is_pro = gate.is_pro(&user_id).await?;
        let status = gate.status(&user_id).await?;
        let remaining_generations = gate.remaining_generations(&user_id).await?;

        Ok(Json(SubscriptionStatusResponse {
            is_pro,
            status,
            remaining_generations,
        }))
    }
}
