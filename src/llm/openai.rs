// ABOUTME: OpenAI-compatible LLM provider for cloud OpenAI and local inference servers
// ABOUTME: One wire implementation covers api.openai.com, Ollama, and vLLM endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # `OpenAI`-Compatible Provider
//!
//! Implementation of the [`LlmProvider`] trait against the `OpenAI` chat
//! completions wire format. The same implementation serves two
//! configurations:
//!
//! - **Cloud**: `https://api.openai.com/v1` with `OPENAI_API_KEY` (required)
//! - **Local**: an `OpenAI`-compatible server such as Ollama or vLLM via
//!   `LOCAL_LLM_BASE_URL` (API key optional)
//!
//! Every request carries the process-wide timeout from
//! [`LlmConfig`](crate::config::LlmConfig); a timed-out call surfaces as an
//! external-service error and is never retried.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::config::LlmConfig;
use crate::errors::{AppError, AppResult};

/// Environment variable for the `OpenAI` API key
const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable for the local inference server base URL
const LOCAL_BASE_URL_ENV: &str = "LOCAL_LLM_BASE_URL";

/// Environment variable for the local inference server model
const LOCAL_MODEL_ENV: &str = "LOCAL_LLM_MODEL";

/// Base URL for the `OpenAI` API
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default base URL for a local Ollama server
const LOCAL_DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Default `OpenAI` model
const OPENAI_DEFAULT_MODEL: &str = "gpt-4-1106-preview";

/// Default local model
const LOCAL_DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";

/// Available `OpenAI` models
const OPENAI_MODELS: &[&str] = &[
    "gpt-4-1106-preview",
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-3.5-turbo-1106",
];

/// Available local models (advisory; local servers accept arbitrary names)
const LOCAL_MODELS: &[&str] = &["qwen2.5:14b-instruct", "llama3.1:8b", "mistral:7b"];

// ============================================================================
// API Request/Response Types (OpenAI wire format)
// ============================================================================

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// Message structure for the chat completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for ApiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// Response format constraint (JSON mode)
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
    model: String,
}

/// Choice in a completion response
#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in a completion response
#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in a completion response
#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

/// API error response body
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Configuration for an `OpenAI`-compatible provider instance
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Bearer token; `None` for unauthenticated local servers
    pub api_key: Option<String>,
    /// Model used when the request does not specify one
    pub default_model: String,
    /// Provider identifier
    pub name: &'static str,
    /// Provider display name
    pub display_name: &'static str,
    /// Advisory model list
    pub available_models: &'static [&'static str],
    /// Per-request timeout
    pub request_timeout: Duration,
}

/// `OpenAI`-compatible LLM provider
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create a provider from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: OpenAiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a cloud `OpenAI` provider from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not set.
    pub fn from_env(llm: &LlmConfig) -> AppResult<Self> {
        let api_key = env::var(OPENAI_API_KEY_ENV).map_err(|_| {
            AppError::config(format!(
                "Missing {OPENAI_API_KEY_ENV} environment variable"
            ))
        })?;

        Self::new(OpenAiConfig {
            base_url: OPENAI_BASE_URL.to_owned(),
            api_key: Some(api_key),
            default_model: llm
                .model
                .clone()
                .unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_owned()),
            name: "openai",
            display_name: "OpenAI",
            available_models: OPENAI_MODELS,
            request_timeout: llm.request_timeout,
        })
    }

    /// Create a local `OpenAI`-compatible provider from the environment
    ///
    /// Uses `LOCAL_LLM_BASE_URL` (default: Ollama at localhost:11434) and
    /// `LOCAL_LLM_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn local_from_env(llm: &LlmConfig) -> AppResult<Self> {
        let base_url =
            env::var(LOCAL_BASE_URL_ENV).unwrap_or_else(|_| LOCAL_DEFAULT_BASE_URL.to_owned());
        let default_model = llm.model.clone().unwrap_or_else(|| {
            env::var(LOCAL_MODEL_ENV).unwrap_or_else(|_| LOCAL_DEFAULT_MODEL.to_owned())
        });

        Self::new(OpenAiConfig {
            base_url,
            api_key: env::var(OPENAI_API_KEY_ENV).ok(),
            default_model,
            name: "local",
            display_name: "Local LLM (Ollama/vLLM)",
            available_models: LOCAL_MODELS,
            request_timeout: llm.request_timeout,
        })
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url)
    }

    /// Convert internal messages to the wire format
    fn convert_messages(messages: &[ChatMessage]) -> Vec<ApiMessage> {
        messages.iter().map(ApiMessage::from).collect()
    }

    /// Attach the bearer token when one is configured
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {key}")),
            None => builder,
        }
    }

    /// Parse an error response body into an `AppError`
    fn parse_error_response(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 => AppError::external_service(
                    self.config.display_name,
                    format!("Authentication failed: {}", error_response.error.message),
                ),
                429 => AppError::external_service(
                    self.config.display_name,
                    format!("Rate limit exceeded: {}", error_response.error.message),
                ),
                _ => AppError::external_service(
                    self.config.display_name,
                    format!("{} - {}", error_type, error_response.error.message),
                ),
            }
        } else {
            AppError::external_service(
                self.config.display_name,
                format!(
                    "API error ({}): {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            )
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        self.config.name
    }

    fn display_name(&self) -> &'static str {
        self.config.display_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    fn available_models(&self) -> &'static [&'static str] {
        self.config.available_models
    }

    #[instrument(skip(self, request), fields(provider = self.config.name, model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        debug!("Sending chat completion request");

        let api_request = ApiRequest {
            model: model.to_owned(),
            messages: Self::convert_messages(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: (request.json_mode && self.capabilities().supports_json_mode())
                .then_some(ResponseFormat {
                    format_type: "json_object",
                }),
        };

        let response = self
            .authorize(self.client.post(self.api_url("chat/completions")))
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {}", self.config.display_name, e);
                AppError::external_service(
                    self.config.display_name,
                    format!("Failed to connect: {e}"),
                )
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read {} response: {}", self.config.display_name, e);
            AppError::external_service(
                self.config.display_name,
                format!("Failed to read response: {e}"),
            )
        })?;

        if !status.is_success() {
            return Err(self.parse_error_response(status, &body));
        }

        let api_response: ApiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse {} response: {}", self.config.display_name, e);
            AppError::external_service(
                self.config.display_name,
                format!("Failed to parse response: {e}"),
            )
        })?;

        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            AppError::external_service(self.config.display_name, "API returned no choices")
        })?;

        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received response: {} chars, finish_reason: {:?}",
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: api_response.model,
            usage: api_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self), fields(provider = self.config.name))]
    async fn health_check(&self) -> AppResult<bool> {
        debug!("Performing LLM API health check");

        let response = self
            .authorize(self.client.get(self.api_url("models")))
            .send()
            .await
            .map_err(|e| {
                error!("Health check failed: {}", e);
                AppError::external_service(
                    self.config.display_name,
                    format!("Health check failed: {e}"),
                )
            })?;

        let healthy = response.status().is_success();

        if !healthy {
            warn!(
                "{} health check failed with status: {}",
                self.config.display_name,
                response.status()
            );
        }

        Ok(healthy)
    }
}
