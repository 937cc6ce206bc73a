//! Integration tests for exercise and food suggestions

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_suggestions_need_a_profile() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, response) = app.get_auth("/api/v1/exercises/suggest", &user.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        response["error"]["message"],
        "User profile not found. Please complete your profile."
    );

    let (status, response) = app.get_auth("/api/v1/food/suggest", &user.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"]["message"], "User profile not found.");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_exercise_suggestion_for_goal() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    app.complete_profile(&user).await;

    let (status, response) = app
        .get_auth("/api/v1/exercises/suggest?date=2026-05-02", &user.token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["user_goal"], "fat_loss");
    assert_eq!(response["data"]["date"], "2026-05-02");
    assert!(!response["data"]["exercises"].as_array().unwrap().is_empty());

    let groups = response["data"]["groups"].as_array().unwrap();
    assert!(!groups.is_empty());
    let grouped: usize = groups.iter().map(|g| g["exercises"].as_array().unwrap().len()).sum();
    assert_eq!(grouped, response["data"]["exercises"].as_array().unwrap().len());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_short_sleep_eases_todays_workout() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    app.complete_profile(&user).await;

    let (_, rested) = app.get_auth("/api/v1/exercises/suggest", &user.token).await;

    app.post_auth("/api/v1/daily-plan/generate", &user.token, json!({})).await;
    app.post_auth("/api/v1/daily-plan/log", &user.token, json!({ "sleep": 5 }))
        .await;
    let (_, tired) = app.get_auth("/api/v1/exercises/suggest", &user.token).await;

    let rested = rested["data"]["exercises"].as_array().unwrap();
    let tired = tired["data"]["exercises"].as_array().unwrap();
    assert_eq!(rested.len(), tired.len());
    assert!(tired.iter().any(|entry| entry.get("note").is_some()));
    assert!(rested.iter().all(|entry| entry.get("note").is_none()));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_suggestion_uses_region_and_allergies() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    app.complete_profile(&user).await;

    let (status, response) = app.get_auth("/api/v1/food/suggest", &user.token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["dietary_region"], "indian");
    let breakfast = response["data"]["menu"]["breakfast"].as_array().unwrap();
    assert!(!breakfast.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_invalid_date_is_rejected() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    app.complete_profile(&user).await;

    let (status, response) = app
        .get_auth("/api/v1/food/suggest?date=02-05-2026", &user.token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["message"], "Invalid date. Use YYYY-MM-DD.");
}
