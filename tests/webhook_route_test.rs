// ABOUTME: Integration tests for the payment-processor webhook route
// ABOUTME: Signature enforcement plus persisted subscription state transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(missing_docs)]

mod common;

use axum::http::StatusCode;
use common::{create_test_resources, post_raw, MockLlmProvider, TEST_WEBHOOK_SECRET};
use repforge::billing::WebhookSignatureValidator;
use repforge::routes::BillingRoutes;
use serde_json::json;

const USER: &str = "user-hook";

fn subscription_event(event_type: &str, status: &str) -> Vec<u8> {
    json!({
        "id": "evt_1",
        "type": event_type,
        "data": {
            "object": {
                "id": "sub_hook_1",
                "customer": "cus_hook_1",
                "status": status,
                "current_period_end": 1767225600i64,
                "metadata": {"user_id": USER},
                "items": {"data": [{"price": {"id": "price_pro_monthly"}}]}
            }
        }
    })
    .to_string()
    .into_bytes()
}

fn signed_header(body: &[u8]) -> String {
    let signature =
        WebhookSignatureValidator::new(TEST_WEBHOOK_SECRET.to_owned()).sign("1700000000", body);
    format!("t=1700000000,v1={signature}")
}

#[tokio::test]
async fn test_missing_signature_is_rejected_without_state_change() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();
    let body = subscription_event("customer.subscription.created", "active");

    let (status, response) = post_raw(
        BillingRoutes::routes(resources.clone()),
        "/stripe/webhook",
        &[("content-type", "application/json")],
        body,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().contains("No signature found"));
    assert!(resources
        .subscriptions()
        .get_for_user(USER)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_invalid_signature_is_rejected() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();
    let body = subscription_event("customer.subscription.created", "active");

    let (status, _) = post_raw(
        BillingRoutes::routes(resources.clone()),
        "/stripe/webhook",
        &[
            ("content-type", "application/json"),
            ("stripe-signature", "t=1700000000,v1=deadbeef"),
        ],
        body,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resources
        .subscriptions()
        .get_for_user(USER)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_created_event_upserts_subscription() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();
    let body = subscription_event("customer.subscription.created", "active");
    let header = signed_header(&body);

    let (status, response) = post_raw(
        BillingRoutes::routes(resources.clone()),
        "/stripe/webhook",
        &[
            ("content-type", "application/json"),
            ("stripe-signature", &header),
        ],
        body,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["received"], true);

    let record = resources
        .subscriptions()
        .get_for_user(USER)
        .await
        .unwrap()
        .expect("subscription persisted");
    assert_eq!(record.subscription_id, "sub_hook_1");
    assert_eq!(record.customer_id, "cus_hook_1");
    assert_eq!(record.status, "active");
    assert_eq!(record.price_id.as_deref(), Some("price_pro_monthly"));
    assert!(record
        .current_period_end
        .as_deref()
        .unwrap()
        .starts_with("2026-01-01"));
    assert!(record.is_pro());
}

#[tokio::test]
async fn test_updated_event_transitions_status() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();

    let created = subscription_event("customer.subscription.created", "active");
    let header = signed_header(&created);
    let (status, _) = post_raw(
        BillingRoutes::routes(resources.clone()),
        "/stripe/webhook",
        &[("stripe-signature", &header)],
        created,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let updated = subscription_event("customer.subscription.updated", "past_due");
    let header = signed_header(&updated);
    let (status, _) = post_raw(
        BillingRoutes::routes(resources.clone()),
        "/stripe/webhook",
        &[("stripe-signature", &header)],
        updated,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let record = resources
        .subscriptions()
        .get_for_user(USER)
        .await
        .unwrap()
        .expect("subscription still present");
    assert_eq!(record.status, "past_due");
    assert!(!record.is_pro());
}

#[tokio::test]
async fn test_deleted_event_removes_subscription() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();

    let created = subscription_event("customer.subscription.created", "active");
    let header = signed_header(&created);
    post_raw(
        BillingRoutes::routes(resources.clone()),
        "/stripe/webhook",
        &[("stripe-signature", &header)],
        created,
    )
    .await;

    let deleted = subscription_event("customer.subscription.deleted", "canceled");
    let header = signed_header(&deleted);
    let (status, response) = post_raw(
        BillingRoutes::routes(resources.clone()),
        "/stripe/webhook",
        &[("stripe-signature", &header)],
        deleted,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["received"], true);
    assert!(resources
        .subscriptions()
        .get_for_user(USER)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_unrecognized_event_is_acknowledged() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();
    let body = json!({
        "id": "evt_2",
        "type": "invoice.paid",
        "data": {"object": {"id": "in_1", "customer": "cus_x", "status": "paid"}}
    })
    .to_string()
    .into_bytes();
    let header = signed_header(&body);

    let (status, response) = post_raw(
        BillingRoutes::routes(resources),
        "/stripe/webhook",
        &[("stripe-signature", &header)],
        body,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["received"], true);
}

#[tokio::test]
async fn test_malformed_payload_with_valid_signature_is_400() {
    let resources = create_test_resources(MockLlmProvider::with_content("{}"))
        .await
        .unwrap();
    let body = b"not json at all".to_vec();
    let header = signed_header(&body);

    let (status, response) = post_raw(
        BillingRoutes::routes(resources),
        "/stripe/webhook",
        &[("stripe-signature", &header)],
        body,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "INVALID_INPUT");
}
