// ABOUTME: HTTP middleware configuration shared across all routes
// ABOUTME: CORS setup; tracing and body limits are layered in the server module
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP middleware

mod cors;

pub use cors::setup_cors;
