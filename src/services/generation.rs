// ABOUTME: Plan generation pipeline: entitlement, context assembly, LLM call, validation
// ABOUTME: Assigns exercise ids, forces completion flags false, optionally saves a routine
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Plan Generation Service
//!
//! The request pipeline behind `POST /generate-workout`:
//!
//! 1. entitlement gate (403 with a machine-readable code on denial)
//! 2. fetch preferences, falling back to fixed defaults
//! 3. fetch up to five recent history entries for context
//! 4. one LLM call with the coaching prompt, JSON mode, bounded tokens
//! 5. schema validation of the returned plan (hard failure names the
//!    offending day)
//! 6. id assignment and completion-flag reset
//! 7. usage accounting, plus routine persistence in save mode
//!
//! No step retries; the first failure surfaces as the request's single error
//! and no earlier validation failure commits any state.

use std::sync::Arc;
use tracing::{debug, info};

use crate::database::{HistoryManager, PreferenceManager, RoutineManager, UsageManager};
use crate::errors::{AppError, AppResult};
use crate::llm::{prompts, ChatMessage, ChatRequest, LlmProvider};
use crate::models::{Preferences, WorkoutPlan};
use crate::services::EntitlementGate;

/// How many recent history entries feed the prompt
pub const RECENT_HISTORY_LIMIT: i64 = 5;

/// Temperature for plan generation; low for consistent structure
const GENERATION_TEMPERATURE: f32 = 0.3;

/// Token budget for the generated plan
const GENERATION_MAX_TOKENS: u32 = 1000;

/// Plan generation pipeline
pub struct PlanGenerationService {
    llm: Arc<dyn LlmProvider>,
    preferences: PreferenceManager,
    history: HistoryManager,
    routines: RoutineManager,
    usage: UsageManager,
    entitlement: EntitlementGate,
}

impl PlanGenerationService {
    /// Create a new plan generation service
    #[must_use]
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        preferences: PreferenceManager,
        history: HistoryManager,
        routines: RoutineManager,
        usage: UsageManager,
        entitlement: EntitlementGate,
    ) -> Self {
        Self {
            llm,
            preferences,
            history,
            routines,
            usage,
            entitlement,
        }
    }

    /// Generate a workout plan for the user
    ///
    /// In save mode the validated plan is also persisted as a named routine
    /// with a date-stamped name and a description referencing the user's
    /// goal and level.
    ///
    /// # Errors
    ///
    /// Returns a 403-class error when the entitlement gate denies, a
    /// 500-class error when the LLM call fails, its output fails validation,
    /// or a store write fails.
    pub async fn generate(&self, user_id: &str, save_as_routine: bool) -> AppResult<WorkoutPlan> {
        if !self.entitlement.can_generate(user_id).await? {
            return Err(AppError::generation_limit_reached());
        }

        let preferences = self
            .preferences
            .get(user_id)
            .await?
            .unwrap_or_else(|| Preferences::defaults_for(user_id));

        let history = self
            .history
            .list_recent(user_id, RECENT_HISTORY_LIMIT)
            .await?;

        debug!(
            user_id,
            history_entries = history.len(),
            goal = %preferences.primary_goal,
            "Assembling generation prompt"
        );

        let request = ChatRequest::new(vec![
            ChatMessage::system(prompts::PLAN_SYSTEM_PROMPT),
            ChatMessage::user(prompts::plan_generation_prompt(&preferences, &history)),
        ])
        .with_temperature(GENERATION_TEMPERATURE)
        .with_max_tokens(GENERATION_MAX_TOKENS)
        .with_json_mode();

        let response = self.llm.complete(&request).await?;

        let mut plan = Self::parse_plan(&response.content)?;
        plan.normalize();

        self.usage.record(user_id, Some(&plan.name)).await?;

        if save_as_routine {
            let name = format!("AI Workout - {}", chrono::Utc::now().format("%b %-d, %Y"));
            let description = format!(
                "Personalized {} plan for a {} athlete",
                preferences.primary_goal, preferences.experience_level
            );
            let routine = self
                .routines
                .create(user_id, &name, &description, &plan)
                .await?;
            info!(user_id, routine_id = %routine.id, "Saved generated plan as routine");
        }

        info!(
            user_id,
            days = plan.workouts.len(),
            model = %response.model,
            "Workout plan generated"
        );

        Ok(plan)
    }

    /// Validate and type the model's plan output
    ///
    /// The per-day mapping is checked value-by-value before the typed
    /// deserialization so a malformed day produces an error naming it.
    fn parse_plan(content: &str) -> AppResult<WorkoutPlan> {
        let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
            tracing::error!("Failed to parse plan generation response: {e}");
            AppError::invalid_llm_response("Invalid JSON response from language model")
        })?;

        let Some(workouts) = value.get("workouts").and_then(serde_json::Value::as_object) else {
            return Err(AppError::invalid_llm_response(
                "Invalid workout structure in model response",
            ));
        };

        for (day, exercises) in workouts {
            if !exercises.is_array() {
                return Err(AppError::invalid_llm_response(format!(
                    "Invalid exercises array for {day}"
                )));
            }
        }

        serde_json::from_value(value).map_err(|e| {
            AppError::invalid_llm_response(format!("Workout plan failed validation: {e}"))
        })
    }
}
