// ABOUTME: Workout generation route handler
// ABOUTME: POST /generate-workout gates, generates, validates, and returns a plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workout generation route

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::WorkoutPlan;
use crate::resources::ServerResources;

/// Request to generate a workout plan
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateWorkoutRequest {
    /// Requesting user
    #[serde(default)]
    pub user_id: Option<String>,
    /// Persist the generated plan as a named routine
    #[serde(default)]
    pub save_as_routine: bool,
}

/// Workout routes handler
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create the workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/generate-workout", post(Self::generate_workout))
            .with_state(resources)
    }

    /// Generate a workout plan for the requesting user
    async fn generate_workout(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<GenerateWorkoutRequest>,
    ) -> Result<Json<WorkoutPlan>, AppError> {
        let user_id = request
            .user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("userId"))?;

        let plan = resources
            .generation_service()
            .generate(&user_id, request.save_as_routine)
            .await?;

        Ok(Json(plan))
    }
}
