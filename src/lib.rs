// ABOUTME: Library root for the Repforge workout-tracking API
// ABOUTME: Module organization for routes, services, stores, and the LLM provider SPI
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Repforge
//!
//! Backend service for a consumer workout-tracking application: users record
//! exercise routines, submit free-text status updates, and request
//! AI-generated workout plans gated by a subscription tier.
//!
//! ## Architecture
//!
//! - **routes**: thin axum handlers, one module per domain
//! - **services**: the request pipelines (entitlement gate, stats
//!   extraction, plan generation)
//! - **database**: SQLite stores behind per-domain managers
//! - **llm**: pluggable LLM provider SPI with an `OpenAI`-compatible
//!   implementation
//! - **billing**: payment-processor webhook verification and mirrored
//!   subscription state
//! - **tracker**: the purely client-side day/exercise state machine
//!
//! All shared resources are constructed once at startup and injected through
//! [`resources::ServerResources`]; there are no ambient singletons.

/// Payment-processor webhook handling
pub mod billing;
/// Environment-based configuration
pub mod config;
/// SQLite stores and migrations
pub mod database;
/// Unified error handling
pub mod errors;
/// LLM provider SPI and implementations
pub mod llm;
/// Logging setup
pub mod logging;
/// HTTP middleware
pub mod middleware;
/// Domain models
pub mod models;
/// Dependency-injection container
pub mod resources;
/// HTTP route handlers
pub mod routes;
/// Router assembly and serving
pub mod server;
/// Request pipelines
pub mod services;
/// Client-side tracker state machine
pub mod tracker;
