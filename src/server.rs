// ABOUTME: HTTP server assembly: route composition, middleware layers, and serving
// ABOUTME: Merges all domain routers and binds the axum server to the configured port
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # HTTP Server
//!
//! Composes the domain routers into one application router, applies the
//! shared middleware stack (tracing, timeout, body limit, CORS), and runs
//! the axum server.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::info;

use crate::middleware::setup_cors;
use crate::resources::ServerResources;
use crate::routes::{
    BillingRoutes, HealthRoutes, ProfileRoutes, RoutineRoutes, StatsRoutes, SubscriptionRoutes,
    WorkoutRoutes,
};

/// Overall request deadline; must exceed the LLM call timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum accepted request body size (1 MiB)
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the application router with all routes and middleware
#[must_use]
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config.cors);

    Router::new()
        .merge(WorkoutRoutes::routes(Arc::clone(&resources)))
        .merge(StatsRoutes::routes(Arc::clone(&resources)))
        .merge(SubscriptionRoutes::routes(Arc::clone(&resources)))
        .merge(BillingRoutes::routes(Arc::clone(&resources)))
        .merge(ProfileRoutes::routes(Arc::clone(&resources)))
        .merge(RoutineRoutes::routes(Arc::clone(&resources)))
        .merge(HealthRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
}

/// Bind and serve the API until the process is stopped
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(resources: Arc<ServerResources>) -> Result<()> {
    let port = resources.config.http_port;
    let router = build_router(resources);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("HTTP server listening on port {port}");

    axum::serve(listener, router).await?;

    Ok(())
}
