// ABOUTME: CORS middleware configuration for HTTP API endpoints
// ABOUTME: Origin list from CORS_ALLOWED_ORIGINS, wildcard for development
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Configure CORS for the API server
///
/// `CORS_ALLOWED_ORIGINS` holds either `*` (any origin, development) or a
/// comma-separated origin list for production.
#[must_use]
pub fn setup_cors(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.allowed_origins.is_empty() || config.allowed_origins == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    HeaderValue::from_str(trimmed).ok()
                }
            })
            .collect();

        if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("stripe-signature"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
}
