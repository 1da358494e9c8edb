// ABOUTME: Stats extraction and history route handlers
// ABOUTME: POST /process-stats classifies free text; GET /history lists recent entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stats extraction and history routes

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{HistoryEntry, StatsUpdate};
use crate::resources::ServerResources;

/// How many history entries the listing endpoint returns
const HISTORY_PAGE_SIZE: i64 = 50;

/// Request to process one free-text status update
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatsRequest {
    /// Requesting user
    #[serde(default)]
    pub user_id: Option<String>,
    /// Free-text update to classify
    #[serde(default)]
    pub input: Option<String>,
}

/// Response for the history listing
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryListResponse {
    /// Recent entries, newest first
    pub entries: Vec<HistoryEntry>,
}

/// Stats routes handler
pub struct StatsRoutes;

impl StatsRoutes {
    /// Create the stats routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/process-stats", post(Self::process_stats))
            .route("/history/:user_id", get(Self::list_history))
            .with_state(resources)
    }

    /// Classify one free-text update and append it to the history store
    async fn process_stats(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ProcessStatsRequest>,
    ) -> Result<Json<StatsUpdate>, AppError> {
        let user_id = request
            .user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("userId"))?;
        let input = request
            .input
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("input"))?;

        let stats = resources.stats_service().process(&user_id, &input).await?;

        Ok(Json(stats))
    }

    /// List a user's recent history entries
    async fn list_history(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Json<HistoryListResponse>, AppError> {
        let entries = resources
            .history()
            .list_recent(&user_id, HISTORY_PAGE_SIZE)
            .await?;

        Ok(Json(HistoryListResponse { entries }))
    }
}
