// ABOUTME: Unified error handling with error codes, HTTP mapping, and JSON responses
// ABOUTME: Defines AppError, ErrorCode, and the wire-format error envelope for all routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling
//!
//! Centralized error types for the Repforge API. Every failure path in the
//! service funnels into [`AppError`], which carries a machine-readable
//! [`ErrorCode`], a human-readable message, and an optional source error.
//! Axum handlers return `Result<_, AppError>`; the [`IntoResponse`]
//! implementation renders the `{ "error": ..., "code": ... }` envelope the
//! web client expects.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (400)
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    #[serde(rename = "WEBHOOK_SIGNATURE_INVALID")]
    WebhookSignatureInvalid,

    // Entitlement (403)
    #[serde(rename = "GENERATION_LIMIT_REACHED")]
    GenerationLimitReached,

    // Resources (404)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,

    // Upstream and internal (500)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    #[serde(rename = "INVALID_LLM_RESPONSE")]
    InvalidLlmResponse,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    ///
    /// Upstream LLM and persistence failures surface as 500 (generic message,
    /// detail logged server-side) rather than 502; the client treats every
    /// non-4xx failure identically.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::MissingRequiredField | Self::InvalidInput | Self::WebhookSignatureInvalid => {
                StatusCode::BAD_REQUEST
            }
            Self::GenerationLimitReached => StatusCode::FORBIDDEN,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::ExternalServiceError
            | Self::InvalidLlmResponse
            | Self::DatabaseError
            | Self::ConfigError
            | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidInput => "The provided input is invalid",
            Self::WebhookSignatureInvalid => "Webhook signature verification failed",
            Self::GenerationLimitReached => "Workout generation limit reached for this period",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::InvalidLlmResponse => "The language model returned an invalid response",
            Self::DatabaseError => "Database operation failed",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Missing required request field
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {}", field.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Webhook signature missing or invalid
    pub fn webhook_signature(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::WebhookSignatureInvalid, message)
    }

    /// Free-tier generation quota exhausted
    #[must_use]
    pub fn generation_limit_reached() -> Self {
        Self::new(
            ErrorCode::GenerationLimitReached,
            "You have reached your workout generation limit for this month. \
             Upgrade to Pro for unlimited generations.",
        )
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// LLM output failed to parse or validate
    pub fn invalid_llm_response(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidLlmResponse, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response envelope
///
/// The flat `{ error, code }` shape matches what the web client's upgrade
/// prompt and toast handling key off.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Machine-readable error code
    pub code: ErrorCode,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: error.message.clone(),
            code: error.code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();

        if status.is_server_error() {
            tracing::error!(code = ?self.code, source = ?self.source, "{}", self.message);
        } else {
            tracing::debug!(code = ?self.code, "{}", self.message);
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        let message = error.to_string();
        Self::database(message).with_source(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}
