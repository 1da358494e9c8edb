// ABOUTME: Environment-based server configuration with validation at startup
// ABOUTME: Aggregates HTTP, database, LLM, billing, and CORS settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Server Configuration
//!
//! All configuration is read from environment variables at process start.
//! Required credentials (LLM API key, webhook signing secret) are validated
//! here so a misconfigured deployment fails fast instead of at first request.

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::time::Duration;

/// Default HTTP port for the API server
const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default SQLite database URL
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/repforge.db";

/// Default timeout for outbound LLM calls, in seconds
///
/// The upstream API has no server-side deadline of its own; without this the
/// generation request would hang for as long as the socket stays open.
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 45;

/// Which LLM provider backs the generation and extraction services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderType {
    /// `OpenAI` chat completions API
    OpenAi,
    /// Local `OpenAI`-compatible server (Ollama, vLLM)
    Local,
}

impl LlmProviderType {
    /// Environment variable controlling provider selection
    pub const ENV_VAR: &'static str = "REPFORGE_LLM_PROVIDER";

    /// Read the provider type from the environment (defaults to `OpenAi`)
    #[must_use]
    pub fn from_env() -> Self {
        match env::var(Self::ENV_VAR).as_deref() {
            Ok("local" | "ollama" | "vllm") => Self::Local,
            _ => Self::OpenAi,
        }
    }
}

impl fmt::Display for LlmProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (`sqlite:...`)
    pub url: String,
}

/// LLM provider settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider to construct at startup
    pub provider: LlmProviderType,
    /// Model override (provider default when unset)
    pub model: Option<String>,
    /// Timeout applied to every outbound LLM request
    pub request_timeout: Duration,
}

/// Payment processor settings
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Shared secret for webhook signature verification
    pub webhook_secret: String,
}

/// CORS settings
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated origin list, or "*" for any origin
    pub allowed_origins: String,
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database settings
    pub database: DatabaseConfig,
    /// LLM settings
    pub llm: LlmConfig,
    /// Billing settings
    pub billing: BillingConfig,
    /// CORS settings
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_PORT` is not a valid port number or the
    /// webhook signing secret is missing.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("Invalid HTTP_PORT value: {value}"))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),
        };

        let timeout_secs = match env::var("LLM_REQUEST_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .with_context(|| format!("Invalid LLM_REQUEST_TIMEOUT_SECS value: {value}"))?,
            Err(_) => DEFAULT_LLM_TIMEOUT_SECS,
        };

        let llm = LlmConfig {
            provider: LlmProviderType::from_env(),
            model: env::var("LLM_MODEL").ok(),
            request_timeout: Duration::from_secs(timeout_secs),
        };

        let billing = BillingConfig {
            webhook_secret: env::var("STRIPE_WEBHOOK_SECRET")
                .context("Missing STRIPE_WEBHOOK_SECRET environment variable")?,
        };

        let cors = CorsConfig {
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".into()),
        };

        Ok(Self {
            http_port,
            database,
            llm,
            billing,
            cors,
        })
    }

    /// One-line configuration summary for startup logging
    ///
    /// Never includes secrets.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} database={} llm_provider={} llm_timeout={}s cors={}",
            self.http_port,
            self.database.url,
            self.llm.provider,
            self.llm.request_timeout.as_secs(),
            self.cors.allowed_origins,
        )
    }
}
