// ABOUTME: Integration tests for subscription status and limit-check routes
// ABOUTME: Boundary tests around the free-tier quota and pro overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(missing_docs)]

mod common;

use axum::http::StatusCode;
use common::{create_test_resources, post_json, MockLlmProvider};
use repforge::database::SubscriptionUpsert;
use repforge::routes::SubscriptionRoutes;
use repforge::services::FREE_TIER_MONTHLY_GENERATIONS;
use serde_json::json;

const USER: &str = "user-sub";

async fn seed_subscription(
    resources: &repforge::resources::ServerResources,
    user_id: &str,
    status: &str,
) {
    resources
        .subscriptions()
        .upsert(SubscriptionUpsert {
            user_id,
            customer_id: "cus_test",
            subscription_id: &format!("sub_{user_id}"),
            status,
            price_id: Some("price_pro"),
            current_period_end: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_free_user_with_no_usage_can_generate() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();

    let (status, body) = post_json(
        SubscriptionRoutes::routes(resources.clone()),
        "/subscription/check-limit",
        &json!({"userId": USER}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["canGenerate"], true);

    let (status, body) = post_json(
        SubscriptionRoutes::routes(resources),
        "/subscription/status",
        &json!({"userId": USER}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isPro"], false);
    assert_eq!(body["status"], "free");
    assert_eq!(
        body["remainingGenerations"],
        FREE_TIER_MONTHLY_GENERATIONS
    );
}

#[tokio::test]
async fn test_quota_boundary() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();

    // Exactly quota - 1 used: still allowed
    for _ in 0..FREE_TIER_MONTHLY_GENERATIONS - 1 {
        resources.usage().record(USER, None).await.unwrap();
    }
    let (_, body) = post_json(
        SubscriptionRoutes::routes(resources.clone()),
        "/subscription/check-limit",
        &json!({"userId": USER}),
    )
    .await;
    assert_eq!(body["canGenerate"], true);

    // At quota: denied
    resources.usage().record(USER, None).await.unwrap();
    let (_, body) = post_json(
        SubscriptionRoutes::routes(resources.clone()),
        "/subscription/check-limit",
        &json!({"userId": USER}),
    )
    .await;
    assert_eq!(body["canGenerate"], false);

    let (_, body) = post_json(
        SubscriptionRoutes::routes(resources),
        "/subscription/status",
        &json!({"userId": USER}),
    )
    .await;
    assert_eq!(body["remainingGenerations"], 0);
}

#[tokio::test]
async fn test_active_subscription_is_unlimited() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();
    seed_subscription(&resources, USER, "active").await;

    // Usage far beyond the quota does not matter for pro users
    for _ in 0..FREE_TIER_MONTHLY_GENERATIONS + 5 {
        resources.usage().record(USER, None).await.unwrap();
    }

    let (_, body) = post_json(
        SubscriptionRoutes::routes(resources.clone()),
        "/subscription/check-limit",
        &json!({"userId": USER}),
    )
    .await;
    assert_eq!(body["canGenerate"], true);

    let (_, body) = post_json(
        SubscriptionRoutes::routes(resources),
        "/subscription/status",
        &json!({"userId": USER}),
    )
    .await;
    assert_eq!(body["isPro"], true);
    assert_eq!(body["status"], "active");
    // Unlimited: the field is omitted entirely
    assert!(body.get("remainingGenerations").is_none());
}

#[tokio::test]
async fn test_trialing_subscription_counts_as_pro() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();
    seed_subscription(&resources, USER, "trialing").await;

    let (_, body) = post_json(
        SubscriptionRoutes::routes(resources),
        "/subscription/status",
        &json!({"userId": USER}),
    )
    .await;
    assert_eq!(body["isPro"], true);
    assert_eq!(body["status"], "trialing");
}

#[tokio::test]
async fn test_canceled_subscription_falls_back_to_quota() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();
    seed_subscription(&resources, USER, "canceled").await;

    let (_, body) = post_json(
        SubscriptionRoutes::routes(resources),
        "/subscription/status",
        &json!({"userId": USER}),
    )
    .await;
    assert_eq!(body["isPro"], false);
    assert_eq!(body["status"], "canceled");
    assert_eq!(
        body["remainingGenerations"],
        FREE_TIER_MONTHLY_GENERATIONS
    );
}

#[tokio::test]
async fn test_missing_user_id_rejected() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();

    let (status, body) = post_json(
        SubscriptionRoutes::routes(resources.clone()),
        "/subscription/check-limit",
        &json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_REQUIRED_FIELD");

    let (status, _) = post_json(
        SubscriptionRoutes::routes(resources),
        "/subscription/status",
        &json!({"userId": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
