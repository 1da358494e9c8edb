// ABOUTME: Shared test utilities: in-memory database, mock LLM, request helpers
// ABOUTME: Keeps integration tests free of setup duplication
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Shared test utilities for `repforge`

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use repforge::config::{
    BillingConfig, CorsConfig, DatabaseConfig, LlmConfig, LlmProviderType, ServerConfig,
};
use repforge::database::Database;
use repforge::errors::{AppError, AppResult};
use repforge::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use repforge::resources::ServerResources;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tower::ServiceExt;

static INIT_LOGGER: Once = Once::new();

/// Webhook signing secret used by every test config
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    Ok(Arc::new(Database::new("sqlite::memory:").await?))
}

/// Server configuration for tests; no environment variables involved
pub fn create_test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database: DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
        },
        llm: LlmConfig {
            provider: LlmProviderType::Local,
            model: None,
            request_timeout: Duration::from_secs(5),
        },
        billing: BillingConfig {
            webhook_secret: TEST_WEBHOOK_SECRET.to_owned(),
        },
        cors: CorsConfig {
            allowed_origins: "*".to_owned(),
        },
    }
}

/// One scripted reply from the mock provider
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this content as the completion
    Content(String),
    /// Fail the call with an external-service error
    Error(String),
}

/// Scripted LLM provider for tests
///
/// Pops one reply per `complete` call and records every request so tests can
/// assert on the prompts that were actually sent.
pub struct MockLlmProvider {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockLlmProvider {
    /// Create a provider that replies with the given content strings in order
    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Create a provider that answers every call with the same content
    pub fn with_content(content: &str) -> Arc<Self> {
        Self::with_replies([MockReply::Content(content.to_owned())])
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn display_name(&self) -> &'static str {
        "Mock LLM"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    fn available_models(&self) -> &'static [&'static str] {
        &["mock-model"]
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockReply::Error("mock provider exhausted".to_owned()));

        match reply {
            MockReply::Content(content) => Ok(ChatResponse {
                content,
                model: "mock-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            MockReply::Error(message) => Err(AppError::external_service("Mock LLM", message)),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Build server resources around an in-memory database and the given provider
pub async fn create_test_resources(
    llm: Arc<dyn LlmProvider>,
) -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(
        database,
        llm,
        Arc::new(create_test_config()),
    )))
}

// ============================================================================
// Request helpers
// ============================================================================

/// Execute one request against a router and return status + parsed JSON body
async fn execute(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.expect("request executes");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}

/// POST a JSON body
pub async fn post_json(
    router: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");
    execute(router, request).await
}

/// POST raw bytes with extra headers (webhook tests)
pub async fn post_raw(
    router: Router,
    uri: &str,
    headers: &[(&str, &str)],
    body: Vec<u8>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::from(body)).expect("request builds");
    execute(router, request).await
}

/// GET a resource
pub async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request builds");
    execute(router, request).await
}

/// DELETE a resource
pub async fn delete_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("request builds");
    execute(router, request).await
}

/// PUT a JSON body
pub async fn put_json(
    router: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");
    execute(router, request).await
}

/// A well-formed plan the mock provider can return
pub fn sample_plan_json() -> String {
    serde_json::json!({
        "name": "Upper/Lower Split",
        "description": "Four-day split focused on progressive overload.",
        "workouts": {
            "day1": [
                {"name": "Bench Press", "sets": 4, "reps": 8, "notes": "Elbows tucked",
                 "targetMuscles": ["chest", "triceps"], "completed": true},
                {"name": "Barbell Row", "sets": 4, "reps": 8}
            ],
            "day2": [
                {"name": "Back Squat", "sets": 5, "reps": 5}
            ]
        },
        "analysis": {
            "muscleGroupsCovered": {"chest": 1, "back": 1, "legs": 1},
            "weeklyVolume": {"chest": 4, "back": 4, "legs": 5},
            "restPeriods": ["2-3 min on compound lifts"],
            "notes": ["Add weight when all sets hit the rep target"]
        }
    })
    .to_string()
}
