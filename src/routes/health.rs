// ABOUTME: Health check route handler
// ABOUTME: Liveness plus a database ping for readiness probes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Health check route

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status ("ok")
    pub status: String,
    /// Service name
    pub service: String,
    /// Crate version
    pub version: String,
    /// Whether the database answered a ping
    pub database: bool,
}

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health))
            .with_state(resources)
    }

    /// Report service liveness and database reachability
    async fn health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Json<HealthResponse>, AppError> {
        let database = sqlx::query("SELECT 1")
            .fetch_one(resources.database.pool())
            .await
            .is_ok();

        Ok(Json(HealthResponse {
            status: "ok".to_owned(),
            service: env!("CARGO_PKG_NAME").to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            database,
        }))
    }
}
