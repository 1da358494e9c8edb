// ABOUTME: Integration tests for the workout generation route and pipeline
// ABOUTME: Covers validation, defaults fallback, save mode, and failure isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(missing_docs)]

mod common;

use axum::http::StatusCode;
use common::{create_test_resources, post_json, sample_plan_json, MockLlmProvider, MockReply};
use repforge::models::Preferences;
use repforge::routes::WorkoutRoutes;
use serde_json::json;

const USER: &str = "user-gen";

#[tokio::test]
async fn test_generate_workout_success() {
    let llm = MockLlmProvider::with_content(&sample_plan_json());
    let resources = create_test_resources(llm).await.unwrap();
    let router = WorkoutRoutes::routes(resources.clone());

    let (status, body) = post_json(router, "/generate-workout", &json!({"userId": USER})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Upper/Lower Split");

    // Every day's value is a list; every exercise has a non-empty id and
    // completed == false, even where the model claimed otherwise
    let workouts = body["workouts"].as_object().unwrap();
    assert!(!workouts.is_empty());
    for exercises in workouts.values() {
        let exercises = exercises.as_array().expect("day value is a list");
        for exercise in exercises {
            assert!(!exercise["id"].as_str().unwrap().is_empty());
            assert_eq!(exercise["completed"], false);
        }
    }

    // One usage row was recorded for the free-tier window
    let count = resources
        .usage()
        .count_since(USER, chrono::Utc::now() - chrono::Duration::days(30))
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_generate_workout_requires_user_id() {
    let llm = MockLlmProvider::with_content(&sample_plan_json());
    let resources = create_test_resources(llm).await.unwrap();
    let router = WorkoutRoutes::routes(resources);

    let (status, body) = post_json(router, "/generate-workout", &json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_REQUIRED_FIELD");
}

#[tokio::test]
async fn test_generate_workout_uses_defaults_without_preferences() {
    let llm = MockLlmProvider::with_content(&sample_plan_json());
    let resources = create_test_resources(llm.clone()).await.unwrap();
    let router = WorkoutRoutes::routes(resources);

    let (status, _) = post_json(router, "/generate-workout", &json!({"userId": USER})).await;
    assert_eq!(status, StatusCode::OK);

    // The prompt fell back to the fixed defaults
    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    let prompt = &requests[0].messages.last().unwrap().content;
    assert!(prompt.contains("Goal: general fitness"));
    assert!(prompt.contains("Level: beginner"));
    assert!(prompt.contains("Days/week: 3"));
    assert!(prompt.contains("Duration: 60 min"));
}

#[tokio::test]
async fn test_generate_workout_embeds_stored_preferences() {
    let llm = MockLlmProvider::with_content(&sample_plan_json());
    let resources = create_test_resources(llm.clone()).await.unwrap();
    resources
        .preferences()
        .upsert(&Preferences {
            user_id: USER.to_owned(),
            primary_goal: "strength".to_owned(),
            experience_level: "advanced".to_owned(),
            available_equipment: vec!["barbell".to_owned(), "rack".to_owned()],
            preferred_workout_days: 5,
            workout_duration_minutes: 90,
            injury_considerations: vec!["left knee".to_owned()],
            target_muscle_groups: vec!["back".to_owned()],
        })
        .await
        .unwrap();
    let router = WorkoutRoutes::routes(resources);

    let (status, _) = post_json(router, "/generate-workout", &json!({"userId": USER})).await;
    assert_eq!(status, StatusCode::OK);

    let prompt = llm.requests()[0].messages.last().unwrap().content.clone();
    assert!(prompt.contains("Goal: strength"));
    assert!(prompt.contains("Equipment: barbell, rack"));
    assert!(prompt.contains("Injuries: left knee"));
}

#[tokio::test]
async fn test_invalid_llm_json_writes_nothing() {
    let llm = MockLlmProvider::with_content("definitely not json {");
    let resources = create_test_resources(llm).await.unwrap();
    let router = WorkoutRoutes::routes(resources.clone());

    let (status, body) = post_json(router, "/generate-workout", &json!({"userId": USER})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INVALID_LLM_RESPONSE");

    // No partial state: no usage row, no routine
    let count = resources
        .usage()
        .count_since(USER, chrono::Utc::now() - chrono::Duration::days(30))
        .await
        .unwrap();
    assert_eq!(count, 0);
    assert!(resources.routines().list(USER).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_day_that_is_not_a_list_fails_naming_it() {
    let body = json!({
        "name": "Broken",
        "description": "Bad shape",
        "workouts": {"day1": [], "day2": {"oops": true}}
    })
    .to_string();
    let llm = MockLlmProvider::with_content(&body);
    let resources = create_test_resources(llm).await.unwrap();
    let router = WorkoutRoutes::routes(resources);

    let (status, body) = post_json(router, "/generate-workout", &json!({"userId": USER})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid exercises array for day2"));
}

#[tokio::test]
async fn test_llm_failure_surfaces_as_single_error() {
    let llm = MockLlmProvider::with_replies([MockReply::Error("connection reset".to_owned())]);
    let resources = create_test_resources(llm).await.unwrap();
    let router = WorkoutRoutes::routes(resources.clone());

    let (status, body) = post_json(router, "/generate-workout", &json!({"userId": USER})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "EXTERNAL_SERVICE_ERROR");
    assert!(resources.routines().list(USER).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_as_routine_persists_plan() {
    let llm = MockLlmProvider::with_content(&sample_plan_json());
    let resources = create_test_resources(llm).await.unwrap();
    let router = WorkoutRoutes::routes(resources.clone());

    let (status, _) = post_json(
        router,
        "/generate-workout",
        &json!({"userId": USER, "saveAsRoutine": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let routines = resources.routines().list(USER).await.unwrap();
    assert_eq!(routines.len(), 1);
    assert!(routines[0].name.starts_with("AI Workout - "));
    assert!(routines[0]
        .description
        .contains("general fitness"));
    assert!(routines[0].analysis.is_some());
    assert_eq!(routines[0].workouts["day2"][0].name, "Back Squat");
}

#[tokio::test]
async fn test_generation_denied_at_quota() {
    let llm = MockLlmProvider::with_content(&sample_plan_json());
    let resources = create_test_resources(llm).await.unwrap();

    // Exhaust the free tier
    for _ in 0..repforge::services::FREE_TIER_MONTHLY_GENERATIONS {
        resources.usage().record(USER, None).await.unwrap();
    }

    let router = WorkoutRoutes::routes(resources);
    let (status, body) = post_json(router, "/generate-workout", &json!({"userId": USER})).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "GENERATION_LIMIT_REACHED");
}
