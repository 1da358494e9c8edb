// ABOUTME: Service-level tests for the entitlement gate
// ABOUTME: Quota boundaries, pro overrides, and the fail-closed error path
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(missing_docs)]

mod common;

use common::create_test_database;
use repforge::database::{SubscriptionManager, SubscriptionUpsert, UsageManager};
use repforge::services::{EntitlementGate, FREE_TIER_MONTHLY_GENERATIONS};

const USER: &str = "user-gate";

fn gate(database: &repforge::database::Database) -> EntitlementGate {
    EntitlementGate::new(
        SubscriptionManager::new(database.pool().clone()),
        UsageManager::new(database.pool().clone()),
    )
}

#[tokio::test]
async fn test_quota_boundary_at_service_level() {
    let database = create_test_database().await.unwrap();
    let usage = UsageManager::new(database.pool().clone());
    let gate = gate(&database);

    for _ in 0..FREE_TIER_MONTHLY_GENERATIONS - 1 {
        usage.record(USER, None).await.unwrap();
    }
    assert!(gate.can_generate(USER).await.unwrap());
    assert_eq!(gate.remaining_generations(USER).await.unwrap(), Some(1));

    usage.record(USER, None).await.unwrap();
    assert!(!gate.can_generate(USER).await.unwrap());
    assert_eq!(gate.remaining_generations(USER).await.unwrap(), Some(0));
}

#[tokio::test]
async fn test_usage_is_per_user() {
    let database = create_test_database().await.unwrap();
    let usage = UsageManager::new(database.pool().clone());
    let gate = gate(&database);

    for _ in 0..FREE_TIER_MONTHLY_GENERATIONS {
        usage.record("someone-else", None).await.unwrap();
    }

    assert!(gate.can_generate(USER).await.unwrap());
}

#[tokio::test]
async fn test_pro_subscription_overrides_quota() {
    let database = create_test_database().await.unwrap();
    let usage = UsageManager::new(database.pool().clone());
    SubscriptionManager::new(database.pool().clone())
        .upsert(SubscriptionUpsert {
            user_id: USER,
            customer_id: "cus_gate",
            subscription_id: "sub_gate",
            status: "active",
            price_id: None,
            current_period_end: None,
        })
        .await
        .unwrap();
    let gate = gate(&database);

    for _ in 0..FREE_TIER_MONTHLY_GENERATIONS {
        usage.record(USER, None).await.unwrap();
    }

    assert!(gate.can_generate(USER).await.unwrap());
    assert_eq!(gate.remaining_generations(USER).await.unwrap(), None);
}

#[tokio::test]
async fn test_lookup_failure_fails_closed() {
    let database = create_test_database().await.unwrap();
    let gate = gate(&database);

    // A dead pool makes every lookup fail; the gate must error (deny),
    // never grant
    database.pool().close().await;

    assert!(gate.can_generate(USER).await.is_err());
    assert!(gate.is_pro(USER).await.is_err());
    assert!(gate.remaining_generations(USER).await.is_err());
}
