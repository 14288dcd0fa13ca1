//! End-to-end tests for registration, login and user maintenance.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (tp-cli migrate)
//! - The API server running (cargo run -p tradepost-api)
//!
//! Run with: cargo test -p tradepost-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use tradepost_integration_tests::{PASSWORD, TestContext, id_of, unique, user_body};

// ============================================================================
// Registration & Login
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_login_and_me() {
    let ctx = TestContext::new();

    let created = ctx.create_user("alice").await;
    let username = created["username"].as_str().expect("username").to_owned();
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());
    assert_eq!(created["is_active"], true);

    let token = ctx.login(&username).await;

    let resp = ctx
        .client
        .get(ctx.url("/users/me/"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get current user");

    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = resp.json().await.expect("Failed to parse current user");
    assert_eq!(me, created);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_wrong_password_is_unauthorized() {
    let ctx = TestContext::new();
    let created = ctx.create_user("alice").await;
    let username = created["username"].as_str().expect("username");

    let resp = ctx.request_token(username, "not the password").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers()
            .get("www-authenticate")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );

    let unknown = ctx.request_token(&unique("nobody"), PASSWORD).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_altered_token_is_unauthorized() {
    let ctx = TestContext::new();
    let created = ctx.create_user("alice").await;
    let mut token = ctx
        .login(created["username"].as_str().expect("username"))
        .await;

    let last = token.pop().expect("token is empty");
    token.push(if last == 'A' { 'B' } else { 'A' });

    let resp = ctx
        .client
        .get(ctx.url("/users/me/"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get current user");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_username_is_conflict() {
    let ctx = TestContext::new();
    let created = ctx.create_user("alice").await;
    let username = created["username"].as_str().expect("username");

    // Same username, fresh email and phone
    let mut body = user_body(&unique("other"));
    body["username"] = json!(username);

    let resp = ctx
        .client
        .post(ctx.url("/users/create/"))
        .json(&body)
        .send()
        .await
        .expect("Failed to send duplicate user");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let detail: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(detail["detail"], "Username already registered");

    // Nothing from the rejected body was stored
    let users = ctx.all_users().await;
    assert!(
        users
            .iter()
            .all(|u| u["email"] != body["email"] && u["phone"] != body["phone"])
    );
    let holders: Vec<&Value> = users.iter().filter(|u| u["username"] == username).collect();
    assert_eq!(holders, vec![&created]);
}

// ============================================================================
// Maintenance
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_empty_update_leaves_user_unchanged() {
    let ctx = TestContext::new();
    let created = ctx.create_user("alice").await;

    let resp = ctx
        .client
        .put(ctx.url(&format!("/users/update/{}", id_of(&created))))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to update user");

    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse user");
    assert_eq!(updated, created);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_password_update_takes_effect() {
    let ctx = TestContext::new();
    let created = ctx.create_user("alice").await;
    let username = created["username"].as_str().expect("username");

    let resp = ctx
        .client
        .put(ctx.url(&format!("/users/update/{}", id_of(&created))))
        .json(&json!({ "password": "a brand new secret" }))
        .send()
        .await
        .expect("Failed to update user");
    assert_eq!(resp.status(), StatusCode::OK);

    let old = ctx.request_token(username, PASSWORD).await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);
    let new = ctx.request_token(username, "a brand new secret").await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_delete_user_then_missing() {
    let ctx = TestContext::new();
    let created = ctx.create_user("alice").await;
    let path = format!("/users/delete/{}", id_of(&created));

    let resp = ctx
        .client
        .delete(ctx.url(&path))
        .send()
        .await
        .expect("Failed to delete user");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse delete response");
    assert_eq!(body["message"], "User deleted successfully");

    let again = ctx
        .client
        .delete(ctx.url(&path))
        .send()
        .await
        .expect("Failed to delete user");
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    let body: Value = again.json().await.expect("Failed to parse error");
    assert_eq!(body["detail"], "User not found");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_user_list_respects_limit() {
    let ctx = TestContext::new();
    ctx.create_user("alice").await;
    ctx.create_user("alice").await;

    let resp = ctx
        .client
        .get(ctx.url("/users/?skip=0&limit=1"))
        .send()
        .await
        .expect("Failed to list users");

    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<Value> = resp.json().await.expect("Failed to parse users");
    assert_eq!(users.len(), 1);
}
