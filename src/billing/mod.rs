// ABOUTME: Billing module for payment-processor webhook handling
// ABOUTME: Signature verification plus subscription state transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment-processor integration boundary
//!
//! The processor itself (checkout, invoicing, retries) is an external
//! collaborator; this module only verifies its webhook signatures and mirrors
//! subscription state transitions into the local store.

mod webhook;

pub use webhook::{SignatureValidation, StripeWebhookHandler, WebhookResult, WebhookSignatureValidator};
