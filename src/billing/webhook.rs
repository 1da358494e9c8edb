// ABOUTME: Stripe webhook handler verifying signatures and persisting subscription state
// ABOUTME: HMAC-SHA256 over "{timestamp}.{body}" with constant-time comparison
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Stripe Webhook Handler
//!
//! Incoming webhook requests carry a `Stripe-Signature` header of the form
//! `t=<timestamp>,v1=<signature>`. The signature is an HMAC-SHA256 of
//! `"{timestamp}.{raw body}"` under the shared signing secret. This handler
//! validates signatures before touching any state.
//!
//! ## Event Types
//!
//! - `customer.subscription.created` / `customer.subscription.updated` —
//!   upsert the mirrored subscription row
//! - `customer.subscription.deleted` — remove the mirrored row
//! - anything else — acknowledged and ignored

use ring::hmac;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::database::{SubscriptionManager, SubscriptionUpsert};
use crate::errors::{AppError, AppResult};

/// Webhook signature validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureValidation {
    /// Signature is valid
    Valid,
    /// Signature is invalid
    Invalid,
    /// Signature header is missing
    Missing,
}

/// Validates Stripe webhook signatures
pub struct WebhookSignatureValidator {
    /// Webhook signing secret
    signing_secret: String,
}

impl WebhookSignatureValidator {
    /// Create a new signature validator
    #[must_use]
    pub const fn new(signing_secret: String) -> Self {
        Self { signing_secret }
    }

    /// Validate a webhook request signature
    ///
    /// # Arguments
    /// * `signature_header` - Value of the `Stripe-Signature` header
    /// * `body` - Raw request body bytes
    #[must_use]
    pub fn validate(&self, signature_header: Option<&str>, body: &[u8]) -> SignatureValidation {
        let Some(signature) = signature_header else {
            return SignatureValidation::Missing;
        };

        // Parse the signature format: "t=timestamp,v1=signature"
        let parts: Vec<&str> = signature.split(',').collect();
        let timestamp = parts
            .iter()
            .find_map(|p| p.trim().strip_prefix("t="));
        let sig_value = parts
            .iter()
            .find_map(|p| p.trim().strip_prefix("v1="));

        let (Some(timestamp), Some(sig_value)) = (timestamp, sig_value) else {
            return SignatureValidation::Invalid;
        };

        // The signed payload is "{timestamp}.{body}"
        let mut signed_payload = Vec::with_capacity(timestamp.len() + 1 + body.len());
        signed_payload.extend_from_slice(timestamp.as_bytes());
        signed_payload.push(b'.');
        signed_payload.extend_from_slice(body);

        let key = hmac::Key::new(hmac::HMAC_SHA256, self.signing_secret.as_bytes());
        let tag = hmac::sign(&key, &signed_payload);
        let expected = hex::encode(tag.as_ref());

        // Constant-time comparison to prevent timing attacks
        if subtle::ConstantTimeEq::ct_eq(sig_value.as_bytes(), expected.as_bytes()).into() {
            SignatureValidation::Valid
        } else {
            SignatureValidation::Invalid
        }
    }

    /// Compute the `v1` signature for a payload; used by tests to build
    /// valid webhook requests
    #[must_use]
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> String {
        let mut signed_payload = Vec::with_capacity(timestamp.len() + 1 + body.len());
        signed_payload.extend_from_slice(timestamp.as_bytes());
        signed_payload.push(b'.');
        signed_payload.extend_from_slice(body);

        let key = hmac::Key::new(hmac::HMAC_SHA256, self.signing_secret.as_bytes());
        hex::encode(hmac::sign(&key, &signed_payload).as_ref())
    }
}

/// Result of processing a webhook event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookResult {
    /// Subscription state was updated
    Processed {
        /// Event type that was processed
        event_type: String,
        /// Processor subscription id
        subscription_id: String,
    },
    /// Recognized shape but no state change was applicable
    Ignored {
        /// Event type
        event_type: String,
    },
}

// ============================================================================
// Event payload types (the subset of the processor's schema we consume)
// ============================================================================

#[derive(Debug, Deserialize)]
struct StripeEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: StripeSubscription,
}

#[derive(Debug, Deserialize)]
struct StripeSubscription {
    id: String,
    customer: String,
    status: String,
    #[serde(default)]
    current_period_end: Option<i64>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
    #[serde(default)]
    items: Option<StripeItems>,
}

#[derive(Debug, Deserialize)]
struct StripeItems {
    #[serde(default)]
    data: Vec<StripeItem>,
}

#[derive(Debug, Deserialize)]
struct StripeItem {
    #[serde(default)]
    price: Option<StripePrice>,
}

#[derive(Debug, Deserialize)]
struct StripePrice {
    id: String,
}

impl StripeSubscription {
    fn price_id(&self) -> Option<&str> {
        self.items
            .as_ref()?
            .data
            .first()?
            .price
            .as_ref()
            .map(|p| p.id.as_str())
    }

    fn period_end_rfc3339(&self) -> Option<String> {
        self.current_period_end
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.to_rfc3339())
    }
}

// ============================================================================
// Handler
// ============================================================================

/// Stripe webhook handler
///
/// Verifies signatures and mirrors subscription state transitions into the
/// subscription store, keyed by the processor's customer/subscription ids.
pub struct StripeWebhookHandler {
    subscriptions: SubscriptionManager,
    validator: WebhookSignatureValidator,
}

impl StripeWebhookHandler {
    /// Create a new webhook handler
    #[must_use]
    pub const fn new(
        subscriptions: SubscriptionManager,
        validator: WebhookSignatureValidator,
    ) -> Self {
        Self {
            subscriptions,
            validator,
        }
    }

    /// Validate a webhook request signature
    #[must_use]
    pub fn validate_signature(
        &self,
        signature_header: Option<&str>,
        body: &[u8],
    ) -> SignatureValidation {
        self.validator.validate(signature_header, body)
    }

    /// Process a verified webhook payload
    ///
    /// # Errors
    ///
    /// Returns an error when the payload does not parse or a store write
    /// fails. Signature validation must happen before this is called.
    pub async fn process(&self, body: &[u8]) -> AppResult<WebhookResult> {
        let event: StripeEvent = serde_json::from_slice(body)
            .map_err(|e| AppError::invalid_input(format!("Malformed webhook payload: {e}")))?;

        debug!("Processing webhook event: {}", event.event_type);

        match event.event_type.as_str() {
            "customer.subscription.created" | "customer.subscription.updated" => {
                self.apply_subscription_change(&event.event_type, &event.data.object)
                    .await
            }
            "customer.subscription.deleted" => {
                let removed = self
                    .subscriptions
                    .delete_by_subscription_id(&event.data.object.id)
                    .await?;

                if removed {
                    info!(
                        "Subscription {} deleted via webhook",
                        event.data.object.id
                    );
                    Ok(WebhookResult::Processed {
                        event_type: event.event_type,
                        subscription_id: event.data.object.id,
                    })
                } else {
                    Ok(WebhookResult::Ignored {
                        event_type: event.event_type,
                    })
                }
            }
            _ => {
                debug!("Unhandled webhook event type: {}", event.event_type);
                Ok(WebhookResult::Ignored {
                    event_type: event.event_type,
                })
            }
        }
    }

    /// Upsert the mirrored row for a created/updated subscription
    ///
    /// The owning user comes from `metadata.user_id`, stamped on the
    /// subscription at checkout. Without it a created event cannot be
    /// attributed to a user, so only an existing row's status is refreshed.
    async fn apply_subscription_change(
        &self,
        event_type: &str,
        subscription: &StripeSubscription,
    ) -> AppResult<WebhookResult> {
        match subscription.metadata.get("user_id") {
            Some(user_id) => {
                self.subscriptions
                    .upsert(SubscriptionUpsert {
                        user_id,
                        customer_id: &subscription.customer,
                        subscription_id: &subscription.id,
                        status: &subscription.status,
                        price_id: subscription.price_id(),
                        current_period_end: subscription.period_end_rfc3339(),
                    })
                    .await?;

                info!(
                    "Subscription {} for user {} -> {}",
                    subscription.id, user_id, subscription.status
                );
                Ok(WebhookResult::Processed {
                    event_type: event_type.to_owned(),
                    subscription_id: subscription.id.clone(),
                })
            }
            None => {
                let updated = self
                    .subscriptions
                    .update_status(&subscription.id, &subscription.status)
                    .await?;

                if updated {
                    Ok(WebhookResult::Processed {
                        event_type: event_type.to_owned(),
                        subscription_id: subscription.id.clone(),
                    })
                } else {
                    warn!(
                        "Webhook for unknown subscription {} without user_id metadata; ignoring",
                        subscription.id
                    );
                    Ok(WebhookResult::Ignored {
                        event_type: event_type.to_owned(),
                    })
                }
            }
        }
    }
}
