// ABOUTME: Centralized resource container for dependency injection
// ABOUTME: Database pool, LLM provider, webhook handler, and config built once in main
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Server Resources
//!
//! Centralized resource container for dependency injection. The container is
//! constructed once at startup and shared via `Arc`; handlers and services
//! receive what they need from it instead of reaching for ambient
//! singletons. Store managers are cheap pool handles and are constructed on
//! demand.

use std::sync::Arc;

use crate::billing::{StripeWebhookHandler, WebhookSignatureValidator};
use crate::config::ServerConfig;
use crate::database::{
    Database, EquipmentManager, HistoryManager, PreferenceManager, RoutineManager,
    SubscriptionManager, UsageManager,
};
use crate::llm::LlmProvider;
use crate::services::{EntitlementGate, PlanGenerationService, StatsExtractionService};

/// Shared server resources
pub struct ServerResources {
    /// Database connection pool and migrations
    pub database: Arc<Database>,
    /// The configured LLM provider
    pub llm: Arc<dyn LlmProvider>,
    /// Webhook handler with its signature validator
    pub webhook: StripeWebhookHandler,
    /// Process configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create the resource container
    #[must_use]
    pub fn new(
        database: Arc<Database>,
        llm: Arc<dyn LlmProvider>,
        config: Arc<ServerConfig>,
    ) -> Self {
        let webhook = StripeWebhookHandler::new(
            SubscriptionManager::new(database.pool().clone()),
            WebhookSignatureValidator::new(config.billing.webhook_secret.clone()),
        );

        Self {
            database,
            llm,
            webhook,
            config,
        }
    }

    /// Preference store handle
    #[must_use]
    pub fn preferences(&self) -> PreferenceManager {
        PreferenceManager::new(self.database.pool().clone())
    }

    /// History store handle
    #[must_use]
    pub fn history(&self) -> HistoryManager {
        HistoryManager::new(self.database.pool().clone())
    }

    /// Routine store handle
    #[must_use]
    pub fn routines(&self) -> RoutineManager {
        RoutineManager::new(self.database.pool().clone())
    }

    /// Equipment store handle
    #[must_use]
    pub fn equipment(&self) -> EquipmentManager {
        EquipmentManager::new(self.database.pool().clone())
    }

    /// Subscription store handle
    #[must_use]
    pub fn subscriptions(&self) -> SubscriptionManager {
        SubscriptionManager::new(self.database.pool().clone())
    }

    /// Usage counter handle
    #[must_use]
    pub fn usage(&self) -> UsageManager {
        UsageManager::new(self.database.pool().clone())
    }

    /// Entitlement gate over the subscription and usage stores
    #[must_use]
    pub fn entitlement_gate(&self) -> EntitlementGate {
        EntitlementGate::new(self.subscriptions(), self.usage())
    }

    /// Stats extraction service
    #[must_use]
    pub fn stats_service(&self) -> StatsExtractionService {
        StatsExtractionService::new(Arc::clone(&self.llm), self.history())
    }

    /// Plan generation service
    #[must_use]
    pub fn generation_service(&self) -> PlanGenerationService {
        PlanGenerationService::new(
            Arc::clone(&self.llm),
            self.preferences(),
            self.history(),
            self.routines(),
            self.usage(),
            self.entitlement_gate(),
        )
    }
}
