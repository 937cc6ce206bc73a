//! Integration tests for support tickets and the admin console

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_ticket_lifecycle() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    let admin = app.create_admin_user().await;

    let (status, ticket) = app
        .post_auth("/api/v1/support", &user.token, json!({ "message": "  Cannot log water  " }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ticket["data"]["message"], "Cannot log water");
    assert_eq!(ticket["data"]["status"], "pending");
    let ticket_id = ticket["data"]["id"].as_str().unwrap().to_string();

    let (_, inbox) = app.get_auth("/api/v1/admin/support", &admin.token).await;
    let entry = inbox["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == ticket_id.as_str())
        .cloned()
        .unwrap();
    assert_eq!(entry["user_name"], "Asha Rao");
    assert_eq!(entry["user_email"], user.email.as_str());

    let (status, replied) = app
        .put_auth(
            &format!("/api/v1/admin/support/{}", ticket_id),
            &admin.token,
            json!({ "reply": "Fixed in the latest release" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replied["data"]["status"], "replied");

    let (_, mine) = app.get_auth("/api/v1/support", &user.token).await;
    assert_eq!(mine["data"][0]["admin_reply"], "Fixed in the latest release");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_empty_ticket_and_reply_are_rejected() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    let admin = app.create_admin_user().await;

    let (status, response) = app
        .post_auth("/api/v1/support", &user.token, json!({ "message": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["message"], "Message is required");

    let (_, ticket) = app
        .post_auth("/api/v1/support", &user.token, json!({ "message": "Help" }))
        .await;
    let (status, response) = app
        .put_auth(
            &format!("/api/v1/admin/support/{}", ticket["data"]["id"].as_str().unwrap()),
            &admin.token,
            json!({ "reply": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["message"], "Reply is required");

    let (status, _) = app
        .put_auth(
            &format!("/api/v1/admin/support/{}", uuid::Uuid::new_v4()),
            &admin.token,
            json!({ "reply": "Hello" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_admin_routes_reject_regular_users() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, response) = app.get_auth("/api/v1/admin/users", &user.token).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error"]["message"], "Not authorized as an admin");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_admin_user_directory_and_delete() {
    let app = common::TestApp::new().await;
    let admin = app.create_admin_user().await;
    let user = app.create_test_user().await;
    app.complete_profile(&user).await;

    let (status, response) = app.get_auth("/api/v1/admin/users", &admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["data"]["stats"]["total"].as_i64().unwrap() >= 2);
    assert!(response["data"]["users"]
        .as_array()
        .unwrap()
        .iter()
        .any(|u| u["email"] == user.email.as_str()));

    let (status, response) = app
        .delete_auth(&format!("/api/v1/admin/users/{}", user.id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["message"], "User successfully deleted.");

    // Profile and plans go with the account
    let (status, _) = app.get_auth("/api/v1/auth/me", &user.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .delete_auth(&format!("/api/v1/admin/users/{}", user.id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_admin_cannot_delete_admin() {
    let app = common::TestApp::new().await;
    let admin = app.create_admin_user().await;
    let other_admin = app.create_admin_user().await;

    let (status, response) = app
        .delete_auth(&format!("/api/v1/admin/users/{}", other_admin.id), &admin.token)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error"]["message"], "Cannot delete an admin account.");
}
