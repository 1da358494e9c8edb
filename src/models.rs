// ABOUTME: Core domain models for preferences, history, routines, plans, and subscriptions
// ABOUTME: Serde types shared between the HTTP layer, the stores, and the LLM services
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Domain Models
//!
//! Data structures for the workout-tracking domain. Wire names follow the
//! web client's conventions: exercise and analysis fields are camelCase,
//! stored records are snake_case.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Classification of a free-text status update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsType {
    /// Forward-looking plan ("I'm going to squat tomorrow")
    Intention,
    /// Record of a finished activity ("did 3x10 bench at 135")
    #[default]
    Completion,
}

impl StatsType {
    /// String representation as stored in the history table
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Intention => "intention",
            Self::Completion => "completion",
        }
    }
}

/// Perceived workout intensity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

/// Structured fields extracted from one free-text status update
///
/// Every field except the classification is optional: the extraction prompt
/// instructs the model to omit anything not explicitly mentioned or clearly
/// implied, and we never guess on its behalf. A missing `type` defaults to
/// `completion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsUpdate {
    /// Intention vs completion classification
    #[serde(rename = "type", default)]
    pub entry_type: StatsType,
    /// Exercise name if mentioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<String>,
    /// Weight in lbs if mentioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Number of sets if mentioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    /// Number of reps if mentioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Intensity tier inferred from context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    /// Emotional state or energy level if mentioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Any additional relevant information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One append-only workout history row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Row id
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// The raw text as submitted
    pub raw_input: String,
    /// Classification plus extracted fields
    #[serde(flatten)]
    pub stats: StatsUpdate,
    /// Server-assigned creation timestamp (RFC 3339)
    pub created_at: String,
}

/// User fitness preferences, one row per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Owning user
    pub user_id: String,
    /// Primary training goal (strength, endurance, weight-loss, muscle-gain, ...)
    pub primary_goal: String,
    /// Experience level (beginner, intermediate, advanced)
    pub experience_level: String,
    /// Equipment the user has access to
    #[serde(default)]
    pub available_equipment: Vec<String>,
    /// Preferred training days per week
    pub preferred_workout_days: u32,
    /// Preferred session duration in minutes
    pub workout_duration_minutes: u32,
    /// Injuries the plan must work around
    #[serde(default)]
    pub injury_considerations: Vec<String>,
    /// Muscle groups to emphasize
    #[serde(default)]
    pub target_muscle_groups: Vec<String>,
}

impl Preferences {
    /// Fixed fallback used when a user has no preferences row yet
    #[must_use]
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_owned(),
            primary_goal: "general fitness".to_owned(),
            experience_level: "beginner".to_owned(),
            available_equipment: vec!["basic gym equipment".to_owned()],
            preferred_workout_days: 3,
            workout_duration_minutes: 60,
            injury_considerations: Vec::new(),
            target_muscle_groups: vec!["full body".to_owned()],
        }
    }
}

/// One movement entry with target sets/reps within a day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Unique within its day's list; assigned server-side when the model
    /// omits it
    #[serde(default)]
    pub id: String,
    /// Exercise name
    pub name: String,
    /// Target set count
    pub sets: u32,
    /// Target rep count
    pub reps: u32,
    /// Whether the user has checked this exercise off
    #[serde(default)]
    pub completed: bool,
    /// Form cues or other notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Primary and secondary muscles targeted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_muscles: Option<Vec<String>>,
}

impl Exercise {
    /// Create a new exercise with a generated id and `completed = false`
    #[must_use]
    pub fn new(name: impl Into<String>, sets: u32, reps: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            sets,
            reps,
            completed: false,
            notes: None,
            target_muscles: None,
        }
    }
}

/// Analysis block attached to a generated plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAnalysis {
    /// Muscle group -> sessions per week touching it
    #[serde(default)]
    pub muscle_groups_covered: BTreeMap<String, u32>,
    /// Muscle group -> total weekly sets
    #[serde(default)]
    pub weekly_volume: BTreeMap<String, u32>,
    /// Rest period guidance
    #[serde(default)]
    pub rest_periods: Vec<String>,
    /// Key coaching points
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Day label -> ordered exercise list
pub type WorkoutMap = BTreeMap<String, Vec<Exercise>>;

/// A generated multi-day workout plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Brief routine name
    pub name: String,
    /// 2-3 sentence focus description
    pub description: String,
    /// Per-day exercise mapping
    pub workouts: WorkoutMap,
    /// Optional analysis block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<PlanAnalysis>,
}

impl WorkoutPlan {
    /// Assign generated ids to exercises that lack one and force every
    /// completion flag to `false`, regardless of what the model returned
    pub fn normalize(&mut self) {
        for exercises in self.workouts.values_mut() {
            for exercise in exercises {
                if exercise.id.is_empty() {
                    exercise.id = Uuid::new_v4().to_string();
                }
                exercise.completed = false;
            }
        }
    }
}

/// A saved, named multi-day workout plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Routine {
    /// Routine id
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Routine name
    pub name: String,
    /// Routine description
    pub description: String,
    /// Per-day exercise mapping
    pub workouts: WorkoutMap,
    /// Optional analysis block carried over from generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<PlanAnalysis>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

/// A user-managed equipment item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    /// Item id
    pub id: String,
    /// Item name
    pub name: String,
    /// Item count, at least 1
    pub quantity: u32,
}

/// Mirrored payment-processor subscription state for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Row id
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Payment processor customer id
    pub customer_id: String,
    /// Payment processor subscription id
    pub subscription_id: String,
    /// Subscription status as reported by the processor
    pub status: String,
    /// Price/plan identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
    /// End of the current billing period (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl SubscriptionRecord {
    /// Whether this subscription grants unlimited generations
    #[must_use]
    pub fn is_pro(&self) -> bool {
        matches!(self.status.as_str(), "active" | "trialing")
    }
}
