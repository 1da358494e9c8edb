// ABOUTME: Prompt construction for plan generation and stats extraction
// ABOUTME: Renders user preferences and recent history into coaching prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Prompts
//!
//! Prompt builders for the two LLM-backed services. The output-shape
//! contracts embedded here are load-bearing: the validation layer in the
//! services assumes exactly these JSON structures.

use crate::models::{HistoryEntry, Preferences};
use chrono::DateTime;

/// System prompt for workout plan generation
pub const PLAN_SYSTEM_PROMPT: &str =
    "You are a precise fitness coach that creates efficient, focused workout routines.";

/// System prompt for stats extraction
pub const STATS_SYSTEM_PROMPT: &str = "You are a fitness tracking assistant that analyzes \
     workout-related text and extracts structured data.";

/// Render one history entry as a prompt line
///
/// Falls back to the raw timestamp when a stored value fails to parse; the
/// model only needs a rough date for context.
fn render_history_line(entry: &HistoryEntry) -> String {
    let date = DateTime::parse_from_rfc3339(&entry.created_at)
        .map_or_else(|_| entry.created_at.clone(), |dt| dt.format("%Y-%m-%d").to_string());
    format!("- {date}: {}", entry.raw_input)
}

/// Build the workout plan generation prompt
///
/// Embeds the user profile, up to five recent history lines, the five fixed
/// coaching principles, and the strict JSON output shape.
#[must_use]
pub fn plan_generation_prompt(preferences: &Preferences, history: &[HistoryEntry]) -> String {
    let equipment = if preferences.available_equipment.is_empty() {
        "basic gym equipment".to_owned()
    } else {
        preferences.available_equipment.join(", ")
    };

    let injuries = if preferences.injury_considerations.is_empty() {
        "none".to_owned()
    } else {
        preferences.injury_considerations.join(", ")
    };

    let targets = if preferences.target_muscle_groups.is_empty() {
        "full body".to_owned()
    } else {
        preferences.target_muscle_groups.join(", ")
    };

    let history_block = if history.is_empty() {
        "No recent history".to_owned()
    } else {
        history
            .iter()
            .map(render_history_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Generate a concise workout routine based on:

User Profile:
- Goal: {goal}
- Level: {level}
- Equipment: {equipment}
- Days/week: {days}
- Duration: {duration} min
- Injuries: {injuries}
- Target: {targets}

Recent History:
{history_block}

Focus on:
1. Progressive overload
2. Proper form
3. Rest periods
4. Exercise variety
5. Injury prevention

Return a JSON workout plan with:
{{
  "name": "Brief routine name",
  "description": "2-3 sentence focus",
  "workouts": {{
    "day1": [{{
      "name": "Exercise",
      "sets": number,
      "reps": number,
      "notes": "Form cues",
      "targetMuscles": ["primary", "secondary"]
    }}]
  }},
  "analysis": {{
    "muscleGroupsCovered": {{"muscle": frequency}},
    "weeklyVolume": {{"muscle": total_sets}},
    "restPeriods": ["guidelines"],
    "notes": ["key points"]
  }}
}}"#,
        goal = preferences.primary_goal,
        level = preferences.experience_level,
        days = preferences.preferred_workout_days,
        duration = preferences.workout_duration_minutes,
    )
}

/// Build the stats extraction prompt for one free-text update
#[must_use]
pub fn stats_extraction_prompt(input: &str) -> String {
    format!(
        r#"Analyze the following workout-related text and extract relevant information.
If it's about a future intention, classify as "intention". If it's about a completed workout, classify as "completion".

Text: "{input}"

Return a JSON object with these fields (include only if mentioned or clearly implied):
{{
  "type": "intention" or "completion",
  "exercise": name of exercise if mentioned,
  "weight": weight in lbs if mentioned (number only),
  "sets": number of sets if mentioned (number only),
  "reps": number of reps if mentioned (number only),
  "intensity": "low", "medium", or "high" based on context,
  "mood": emotional state or energy level if mentioned,
  "notes": any additional relevant information
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatsUpdate;

    fn entry(raw: &str, created_at: &str) -> HistoryEntry {
        HistoryEntry {
            id: "h1".to_owned(),
            user_id: "u1".to_owned(),
            raw_input: raw.to_owned(),
            stats: StatsUpdate {
                entry_type: crate::models::StatsType::Completion,
                exercise: None,
                weight: None,
                sets: None,
                reps: None,
                intensity: None,
                mood: None,
                notes: None,
            },
            created_at: created_at.to_owned(),
        }
    }

    #[test]
    fn test_plan_prompt_embeds_profile() {
        let preferences = Preferences::defaults_for("u1");
        let prompt = plan_generation_prompt(&preferences, &[]);

        assert!(prompt.contains("Goal: general fitness"));
        assert!(prompt.contains("Level: beginner"));
        assert!(prompt.contains("Days/week: 3"));
        assert!(prompt.contains("Duration: 60 min"));
        assert!(prompt.contains("No recent history"));
        assert!(prompt.contains("Progressive overload"));
        assert!(prompt.contains("muscleGroupsCovered"));
    }

    #[test]
    fn test_plan_prompt_renders_history_dates() {
        let preferences = Preferences::defaults_for("u1");
        let history = vec![entry("did squats 3x5", "2026-08-01T10:30:00+00:00")];
        let prompt = plan_generation_prompt(&preferences, &history);

        assert!(prompt.contains("- 2026-08-01: did squats 3x5"));
        assert!(!prompt.contains("No recent history"));
    }

    #[test]
    fn test_stats_prompt_quotes_input() {
        let prompt = stats_extraction_prompt("bench felt heavy today");
        assert!(prompt.contains(r#"Text: "bench felt heavy today""#));
        assert!(prompt.contains(r#""type": "intention" or "completion""#));
    }
}
