// ABOUTME: Stats extraction service turning free text into structured history rows
// ABOUTME: One LLM classification call, one append; parse failures persist nothing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Stats Extraction Service
//!
//! Takes one free-text workout update, asks the model to classify it as an
//! intention or completion and extract any explicitly mentioned fields, then
//! appends the result to the history store. The LLM output must be valid
//! JSON; anything else fails the call before any write happens.

use std::sync::Arc;
use tracing::debug;

use crate::database::HistoryManager;
use crate::errors::{AppError, AppResult};
use crate::llm::{prompts, ChatMessage, ChatRequest, LlmProvider};
use crate::models::StatsUpdate;

/// Temperature for the extraction call; classification should be stable
const EXTRACTION_TEMPERATURE: f32 = 0.1;

/// Stats extraction pipeline
pub struct StatsExtractionService {
    llm: Arc<dyn LlmProvider>,
    history: HistoryManager,
}

impl StatsExtractionService {
    /// Create a new stats extraction service
    #[must_use]
    pub fn new(llm: Arc<dyn LlmProvider>, history: HistoryManager) -> Self {
        Self { llm, history }
    }

    /// Classify one free-text update and append it to the history store
    ///
    /// A missing classification field in the model output defaults to
    /// `completion`. Every successful call creates a new row; nothing is
    /// ever overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error when the input is empty, the LLM call fails, its
    /// output is not valid JSON, or the history write fails.
    pub async fn process(&self, user_id: &str, input: &str) -> AppResult<StatsUpdate> {
        if input.trim().is_empty() {
            return Err(AppError::invalid_input("Input text cannot be empty"));
        }

        let request = ChatRequest::new(vec![
            ChatMessage::system(prompts::STATS_SYSTEM_PROMPT),
            ChatMessage::user(prompts::stats_extraction_prompt(input)),
        ])
        .with_temperature(EXTRACTION_TEMPERATURE)
        .with_json_mode();

        let response = self.llm.complete(&request).await?;

        let stats = Self::parse_stats(&response.content)?;

        debug!(
            user_id,
            entry_type = stats.entry_type.as_str(),
            "Extracted workout stats"
        );

        self.history.append(user_id, input, &stats).await?;

        Ok(stats)
    }

    /// Parse the model output into a structured update
    ///
    /// The `type` default to `completion` is handled by the serde default on
    /// [`StatsUpdate`].
    fn parse_stats(content: &str) -> AppResult<StatsUpdate> {
        serde_json::from_str(content).map_err(|e| {
            tracing::error!("Failed to parse stats extraction response: {e}");
            AppError::invalid_llm_response("Invalid JSON response from language model")
        })
    }
}
