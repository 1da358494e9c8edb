// ABOUTME: Route module organization for the Repforge HTTP endpoints
// ABOUTME: Each domain module holds route definitions and thin handler functions
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route modules
//!
//! Routes are organized by domain. Each module exposes a `*Routes` struct
//! whose `routes()` constructor returns an axum `Router` bound to the shared
//! [`ServerResources`](crate::resources::ServerResources). Handlers stay
//! thin and delegate to the service layer.

/// Payment-processor webhook route
pub mod billing;
/// Health check route
pub mod health;
/// Preference and equipment CRUD routes
pub mod profile;
/// Saved routine routes
pub mod routines;
/// Stats extraction and history routes
pub mod stats;
/// Subscription status and limit routes
pub mod subscription;
/// Workout generation route
pub mod workouts;

pub use billing::BillingRoutes;
pub use health::HealthRoutes;
pub use profile::ProfileRoutes;
pub use routines::RoutineRoutes;
pub use stats::StatsRoutes;
pub use subscription::SubscriptionRoutes;
pub use workouts::WorkoutRoutes;
