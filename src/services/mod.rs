// ABOUTME: Service layer between the HTTP routes and the stores/LLM providers
// ABOUTME: Entitlement gating, stats extraction, and plan generation pipelines
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer
//!
//! Routes stay thin; the request pipelines live here. Each service takes its
//! dependencies (store managers, LLM provider) by construction, never through
//! ambient singletons.

mod entitlement;
mod generation;
mod stats;

pub use entitlement::{EntitlementGate, FREE_TIER_MONTHLY_GENERATIONS, USAGE_WINDOW_DAYS};
pub use generation::{PlanGenerationService, RECENT_HISTORY_LIMIT};
pub use stats::StatsExtractionService;
