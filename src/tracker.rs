// ABOUTME: Client-side tracker state machine over one routine-shaped plan
// ABOUTME: Pure in-memory mutations; no server round-trip and no persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Tracker State
//!
//! The interactive grid of days -> exercises the user checks off, edits, and
//! keeps locally. All mutations are purely local; the only interaction with
//! the rest of the system is [`TrackerState::replace_plan`], which swaps the
//! whole state for a freshly generated plan.

use crate::models::{Equipment, Exercise, WorkoutMap, WorkoutPlan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Local tracker state: one plan plus the user's equipment list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerState {
    /// Day label -> ordered exercise list
    pub workouts: WorkoutMap,
    /// User-managed equipment items
    pub equipment: Vec<Equipment>,
}

impl TrackerState {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker seeded with the starter plan and equipment
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            workouts: default_workouts(),
            equipment: default_equipment(),
        }
    }

    /// Toggle an exercise's completed flag
    ///
    /// Returns the new flag value, or `None` if no such exercise exists on
    /// that day. Toggling twice always restores the original value.
    pub fn toggle_exercise(&mut self, day: &str, exercise_id: &str) -> Option<bool> {
        let exercise = self
            .workouts
            .get_mut(day)?
            .iter_mut()
            .find(|e| e.id == exercise_id)?;
        exercise.completed = !exercise.completed;
        Some(exercise.completed)
    }

    /// Add an exercise to a day, assigning a fresh identifier
    ///
    /// Returns the assigned id.
    pub fn add_exercise(&mut self, day: &str, mut exercise: Exercise) -> String {
        exercise.id = Uuid::new_v4().to_string();
        exercise.completed = false;
        let id = exercise.id.clone();
        self.workouts.entry(day.to_owned()).or_default().push(exercise);
        id
    }

    /// Remove an exercise from a day by identifier
    ///
    /// Returns `true` when an exercise was removed.
    pub fn remove_exercise(&mut self, day: &str, exercise_id: &str) -> bool {
        let Some(exercises) = self.workouts.get_mut(day) else {
            return false;
        };
        let before = exercises.len();
        exercises.retain(|e| e.id != exercise_id);
        exercises.len() < before
    }

    /// Add an equipment item, assigning a fresh identifier
    ///
    /// Returns the assigned id, or `None` when the quantity is zero.
    pub fn add_equipment(&mut self, name: impl Into<String>, quantity: u32) -> Option<String> {
        if quantity < 1 {
            return None;
        }
        let item = Equipment {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            quantity,
        };
        let id = item.id.clone();
        self.equipment.push(item);
        Some(id)
    }

    /// Remove an equipment item by identifier
    ///
    /// Returns `true` when an item was removed.
    pub fn remove_equipment(&mut self, equipment_id: &str) -> bool {
        let before = self.equipment.len();
        self.equipment.retain(|e| e.id != equipment_id);
        self.equipment.len() < before
    }

    /// Replace the tracked plan wholesale with a freshly generated one
    ///
    /// Equipment is user-managed and survives the swap.
    pub fn replace_plan(&mut self, plan: WorkoutPlan) {
        self.workouts = plan.workouts;
    }
}

/// Starter weekly plan shown before the user generates anything
#[must_use]
pub fn default_workouts() -> WorkoutMap {
    fn day(exercises: &[(&str, u32, u32)]) -> Vec<Exercise> {
        exercises
            .iter()
            .map(|(name, sets, reps)| Exercise::new(*name, *sets, *reps))
            .collect()
    }

    let strength = [
        ("Dumbbell Chest Press", 3, 10),
        ("Dumbbell Bicep Curls", 3, 12),
        ("Dumbbell Tricep Pulls", 3, 12),
        ("Pull-Ups", 3, 8),
        ("Jump Rope", 1, 1),
        ("Yoga", 1, 1),
    ];
    let conditioning = [
        ("Ab Wheel Rollouts", 3, 10),
        ("Jump Rope (Cardio)", 1, 1),
        ("Football Drills/Play", 1, 1),
        ("Yoga", 1, 1),
    ];

    BTreeMap::from([
        ("Monday".to_owned(), day(&strength)),
        ("Tuesday".to_owned(), day(&conditioning)),
        ("Wednesday".to_owned(), Vec::new()),
        ("Thursday".to_owned(), day(&strength)),
        ("Friday".to_owned(), day(&conditioning)),
        ("Saturday".to_owned(), day(&strength)),
        (
            "Sunday".to_owned(),
            day(&[("Full-Body Stretch", 1, 1)]),
        ),
    ])
}

/// Starter equipment list
#[must_use]
pub fn default_equipment() -> Vec<Equipment> {
    [
        ("Dumbbells (10kg)", 2),
        ("Pull-up Bar", 1),
        ("Jump Rope", 1),
        ("Ab Wheel", 1),
        ("Yoga Mat", 1),
        ("Football", 1),
    ]
    .into_iter()
    .map(|(name, quantity)| Equipment {
        id: Uuid::new_v4().to_string(),
        name: name.to_owned(),
        quantity,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with_one_exercise() -> (TrackerState, String) {
        let mut tracker = TrackerState::new();
        let id = tracker.add_exercise("Monday", Exercise::new("Squats", 5, 5));
        (tracker, id)
    }

    #[test]
    fn test_double_toggle_is_identity() {
        let (mut tracker, id) = tracker_with_one_exercise();

        assert_eq!(tracker.toggle_exercise("Monday", &id), Some(true));
        assert_eq!(tracker.toggle_exercise("Monday", &id), Some(false));
    }

    #[test]
    fn test_toggle_unknown_exercise_is_none() {
        let (mut tracker, _) = tracker_with_one_exercise();

        assert_eq!(tracker.toggle_exercise("Monday", "nope"), None);
        assert_eq!(tracker.toggle_exercise("Tuesday", "nope"), None);
    }

    #[test]
    fn test_add_exercise_assigns_unique_ids() {
        let mut tracker = TrackerState::new();
        let first = tracker.add_exercise("Monday", Exercise::new("Squats", 5, 5));
        let second = tracker.add_exercise("Monday", Exercise::new("Squats", 5, 5));

        assert_ne!(first, second);
        assert_eq!(tracker.workouts["Monday"].len(), 2);
    }

    #[test]
    fn test_remove_exercise() {
        let (mut tracker, id) = tracker_with_one_exercise();

        assert!(tracker.remove_exercise("Monday", &id));
        assert!(!tracker.remove_exercise("Monday", &id));
        assert!(tracker.workouts["Monday"].is_empty());
    }

    #[test]
    fn test_equipment_quantity_floor() {
        let mut tracker = TrackerState::new();

        assert!(tracker.add_equipment("Kettlebell", 0).is_none());
        let id = tracker.add_equipment("Kettlebell", 2).expect("valid item");
        assert!(tracker.remove_equipment(&id));
        assert!(tracker.equipment.is_empty());
    }

    #[test]
    fn test_replace_plan_keeps_equipment() {
        let mut tracker = TrackerState::with_defaults();
        let equipment_count = tracker.equipment.len();

        tracker.replace_plan(WorkoutPlan {
            name: "New".to_owned(),
            description: "Fresh plan".to_owned(),
            workouts: BTreeMap::from([("day1".to_owned(), vec![Exercise::new("Rows", 3, 8)])]),
            analysis: None,
        });

        assert_eq!(tracker.workouts.len(), 1);
        assert_eq!(tracker.equipment.len(), equipment_count);
    }

    #[test]
    fn test_default_plan_shape() {
        let workouts = default_workouts();
        assert_eq!(workouts.len(), 7);
        assert!(workouts["Wednesday"].is_empty());
        assert!(workouts["Sunday"].iter().any(|e| e.name == "Full-Body Stretch"));
        // Every seeded exercise starts unchecked with a unique id per day
        for exercises in workouts.values() {
            let mut seen = std::collections::HashSet::new();
            for exercise in exercises {
                assert!(!exercise.completed);
                assert!(seen.insert(exercise.id.clone()));
            }
        }
    }
}
