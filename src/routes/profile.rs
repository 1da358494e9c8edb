// ABOUTME: Preference and equipment CRUD route handlers
// ABOUTME: The web client formerly hit the hosted database directly for these
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile routes: fitness preferences and equipment

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{Equipment, Preferences};
use crate::resources::ServerResources;

/// Payload for saving preferences; the user id comes from the path
#[derive(Debug, Deserialize)]
pub struct SavePreferencesRequest {
    /// Primary training goal
    pub primary_goal: String,
    /// Experience level
    pub experience_level: String,
    /// Equipment the user has access to
    #[serde(default)]
    pub available_equipment: Vec<String>,
    /// Preferred training days per week
    pub preferred_workout_days: u32,
    /// Preferred session duration in minutes
    pub workout_duration_minutes: u32,
    /// Injuries the plan must work around
    #[serde(default)]
    pub injury_considerations: Vec<String>,
    /// Muscle groups to emphasize
    #[serde(default)]
    pub target_muscle_groups: Vec<String>,
}

/// Payload for adding an equipment item
#[derive(Debug, Deserialize)]
pub struct AddEquipmentRequest {
    /// Item name
    pub name: String,
    /// Item count, at least 1
    pub quantity: u32,
}

/// Response for the equipment listing
#[derive(Debug, Serialize, Deserialize)]
pub struct EquipmentListResponse {
    /// The user's equipment items
    pub equipment: Vec<Equipment>,
}

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create the profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/preferences/:user_id", get(Self::get_preferences))
            .route("/preferences/:user_id", put(Self::save_preferences))
            .route("/equipment/:user_id", get(Self::list_equipment))
            .route("/equipment/:user_id", post(Self::add_equipment))
            .route(
                "/equipment/:user_id/:equipment_id",
                delete(Self::delete_equipment),
            )
            .with_state(resources)
    }

    /// Fetch a user's stored preferences
    async fn get_preferences(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Json<Preferences>, AppError> {
        let preferences = resources
            .preferences()
            .get(&user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Preferences"))?;

        Ok(Json(preferences))
    }

    /// Create or replace a user's preferences
    async fn save_preferences(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        Json(request): Json<SavePreferencesRequest>,
    ) -> Result<Json<Preferences>, AppError> {
        let preferences = Preferences {
            user_id,
            primary_goal: request.primary_goal,
            experience_level: request.experience_level,
            available_equipment: request.available_equipment,
            preferred_workout_days: request.preferred_workout_days,
            workout_duration_minutes: request.workout_duration_minutes,
            injury_considerations: request.injury_considerations,
            target_muscle_groups: request.target_muscle_groups,
        };

        resources.preferences().upsert(&preferences).await?;

        Ok(Json(preferences))
    }

    /// List a user's equipment
    async fn list_equipment(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Json<EquipmentListResponse>, AppError> {
        let equipment = resources.equipment().list(&user_id).await?;
        Ok(Json(EquipmentListResponse { equipment }))
    }

    /// Add one equipment item
    async fn add_equipment(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        Json(request): Json<AddEquipmentRequest>,
    ) -> Result<impl IntoResponse, AppError> {
        let item = resources
            .equipment()
            .add(&user_id, &request.name, request.quantity)
            .await?;

        Ok((StatusCode::CREATED, Json(item)))
    }

    /// Delete one equipment item
    async fn delete_equipment(
        State(resources): State<Arc<ServerResources>>,
        Path((user_id, equipment_id)): Path<(String, String)>,
    ) -> Result<impl IntoResponse, AppError> {
        let deleted = resources
            .equipment()
            .delete(&user_id, &equipment_id)
            .await?;

        if deleted {
            Ok((
                StatusCode::OK,
                Json(serde_json::json!({ "success": true })),
            ))
        } else {
            Ok((
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "success": false, "error": "Equipment not found" })),
            ))
        }
    }
}
