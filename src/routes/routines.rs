// ABOUTME: Saved routine route handlers
// ABOUTME: Listing and explicit deletion, always scoped to the owning user
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routine routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::Routine;
use crate::resources::ServerResources;

/// Response for the routine listing
#[derive(Debug, Serialize, Deserialize)]
pub struct RoutineListResponse {
    /// The user's routines, newest first
    pub routines: Vec<Routine>,
    /// Total count
    pub total: usize,
}

/// Routine routes handler
pub struct RoutineRoutes;

impl RoutineRoutes {
    /// Create the routine routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/routines/:user_id", get(Self::list_routines))
            .route(
                "/routines/:user_id/:routine_id",
                get(Self::get_routine),
            )
            .route(
                "/routines/:user_id/:routine_id",
                delete(Self::delete_routine),
            )
            .with_state(resources)
    }

    /// List a user's saved routines
    async fn list_routines(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Json<RoutineListResponse>, AppError> {
        let routines = resources.routines().list(&user_id).await?;
        let total = routines.len();

        Ok(Json(RoutineListResponse { routines, total }))
    }

    /// Fetch one routine for reloading into the tracker
    async fn get_routine(
        State(resources): State<Arc<ServerResources>>,
        Path((user_id, routine_id)): Path<(String, String)>,
    ) -> Result<Json<Routine>, AppError> {
        let routine = resources
            .routines()
            .get(&user_id, &routine_id)
            .await?
            .ok_or_else(|| AppError::not_found("Routine"))?;

        Ok(Json(routine))
    }

    /// Delete one routine; only the owner's row is ever touched
    async fn delete_routine(
        State(resources): State<Arc<ServerResources>>,
        Path((user_id, routine_id)): Path<(String, String)>,
    ) -> Result<impl IntoResponse, AppError> {
        let deleted = resources
            .routines()
            .delete(&user_id, &routine_id)
            .await?;

        if deleted {
            Ok((
                StatusCode::OK,
                Json(serde_json::json!({ "success": true })),
            ))
        } else {
            Ok((
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "success": false, "error": "Routine not found" })),
            ))
        }
    }
}
