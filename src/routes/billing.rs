// ABOUTME: Payment-processor webhook route handler
// ABOUTME: POST /stripe/webhook verifies the signature before any state change
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Billing webhook route

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::billing::SignatureValidation;
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Acknowledgement returned for every accepted webhook
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    /// Always `true`; the processor only needs a 2xx
    pub received: bool,
}

/// Billing routes handler
pub struct BillingRoutes;

impl BillingRoutes {
    /// Create the billing routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/stripe/webhook", post(Self::stripe_webhook))
            .with_state(resources)
    }

    /// Handle one signed payment-processor event
    ///
    /// The raw body is needed for signature verification, so this handler
    /// takes `Bytes` instead of a typed JSON extractor.
    async fn stripe_webhook(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Json<WebhookAck>, AppError> {
        let signature = headers
            .get("stripe-signature")
            .and_then(|value| value.to_str().ok());

        match resources.webhook.validate_signature(signature, &body) {
            SignatureValidation::Valid => {}
            SignatureValidation::Missing => {
                return Err(AppError::webhook_signature("No signature found"));
            }
            SignatureValidation::Invalid => {
                return Err(AppError::webhook_signature(
                    "Webhook signature verification failed",
                ));
            }
        }

        resources.webhook.process(&body).await?;

        Ok(Json(WebhookAck { received: true }))
    }
}
