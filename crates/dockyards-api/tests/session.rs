// crates/dockyards-api/tests/session.rs
// ============================================================================
// Module: Session Tests
// Description: Login, refresh, whoami, and password change flows.
// Purpose: Verify token discipline and credential checks end to end.
// Dependencies: dockyards-api, dockyards-core, tokio
// ============================================================================

//! Session and credential tests.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    reason = "Test setup uses unwraps for clarity."
)]

mod common;

use axum::http::Method;
use axum::http::StatusCode;
use common::Harness;
use common::PASSWORD;
use dockyards_api::TokenKind;
use dockyards_core::CONDITION_READY;
use dockyards_core::Condition;
use dockyards_core::Timestamp;
use dockyards_core::UserSpec;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Refresh
// ============================================================================

#[tokio::test]
async fn refresh_issues_a_verifiable_pair() {
    let harness = Harness::new().await;
    let user = harness.user("root", "root@dockyards.dev").await;
    let refresh = harness.refresh_token(&user);

    let (status, body) = harness.send(Method::POST, "/v1/refresh", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::OK);
    let access = body["accessToken"].as_str().unwrap();
    let next_refresh = body["refreshToken"].as_str().unwrap();
    let tokens = &harness.state().tokens;
    assert_eq!(tokens.verify(TokenKind::Access, access).unwrap().sub, "root");
    assert_eq!(tokens.verify(TokenKind::Refresh, next_refresh).unwrap().sub, "root");
}

#[tokio::test]
async fn refresh_rejects_access_tokens() {
    let harness = Harness::new().await;
    let user = harness.user("root", "root@dockyards.dev").await;
    let access = harness.access_token(&user);

    let (status, body) = harness.send(Method::POST, "/v1/refresh", Some(&access), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn refresh_rejects_tokens_of_deleted_users() {
    let harness = Harness::new().await;
    let user = harness.user("root", "root@dockyards.dev").await;
    let refresh = harness.refresh_token(&user);
    harness.client().delete::<UserSpec>(None, "root").await.unwrap();

    let (status, _) = harness.send(Method::POST, "/v1/refresh", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_requires_a_bearer_token() {
    let harness = Harness::new().await;
    let (status, _) = harness.send(Method::POST, "/v1/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// SECTION: Login
// ============================================================================

#[tokio::test]
async fn login_returns_tokens_for_valid_credentials() {
    let harness = Harness::new().await;
    harness.user("root", "root@dockyards.dev").await;

    let (status, body) = harness
        .send(Method::POST, "/v1/login", None, Some(json!({"email": "root@dockyards.dev", "password": PASSWORD})))
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["accessToken"].as_str().unwrap();
    let (status, whoami) = harness.get("/v1/whoami", access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(whoami["name"], "root");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let harness = Harness::new().await;
    harness.user("root", "root@dockyards.dev").await;

    let wrong_password = harness
        .send(Method::POST, "/v1/login", None, Some(json!({"email": "root@dockyards.dev", "password": "nope"})))
        .await;
    let unknown_email = harness
        .send(Method::POST, "/v1/login", None, Some(json!({"email": "who@dockyards.dev", "password": PASSWORD})))
        .await;
    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn unknown_emails_are_verified_against_a_stand_in_hash() {
    let harness = Harness::new().await;
    let stand_in = harness.state().settings.unknown_user_hash.clone();
    assert!(stand_in.starts_with("$2b$04$"), "stand-in hash must use the configured cost: {stand_in}");
    assert!(!bcrypt::verify(PASSWORD, &stand_in).unwrap());

    let other = Harness::new().await;
    assert_ne!(other.state().settings.unknown_user_hash, stand_in);

    let (status, _) = harness
        .send(Method::POST, "/v1/login", None, Some(json!({"email": "who@dockyards.dev", "password": PASSWORD})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// SECTION: Whoami
// ============================================================================

#[tokio::test]
async fn whoami_omits_the_password_hash() {
    let harness = Harness::new().await;
    let user = harness.user("root", "root@dockyards.dev").await;

    let (status, body) = harness.get("/v1/whoami", &harness.access_token(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "root@dockyards.dev");
    assert_eq!(body["id"], user.uid());
    assert!(body.get("password").is_none());
    assert!(body.get("updatedAt").is_none());
}

#[tokio::test]
async fn whoami_reports_ready_transition_time() {
    let harness = Harness::new().await;
    let mut user = harness.user("root", "root@dockyards.dev").await;
    let ready_at = Timestamp::from_unix_seconds(1_700_000_000).unwrap();
    user.status.conditions = vec![Condition {
        condition_type: CONDITION_READY.to_string(),
        status: "True".to_string(),
        reason: "Verified".to_string(),
        message: String::new(),
        last_transition_time: ready_at,
    }];
    harness.client().update_status(&user).await.unwrap();

    let (_, body) = harness.get("/v1/whoami", &harness.access_token(&user)).await;
    assert_eq!(body["updatedAt"], serde_json::to_value(ready_at).unwrap());
}

// ============================================================================
// SECTION: Password Change
// ============================================================================

#[tokio::test]
async fn wrong_old_password_leaves_the_hash_unchanged() {
    let harness = Harness::new().await;
    let user = harness.user("root", "root@dockyards.dev").await;
    let token = harness.access_token(&user);

    let (status, _) = harness
        .post("/v1/users/root/password", &token, json!({"oldPassword": "wrong", "newPassword": "fresh"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let stored = harness.client().get::<UserSpec>(None, "root").await.unwrap().unwrap();
    assert_eq!(stored.spec.password, user.spec.password);
}

#[tokio::test]
async fn correct_old_password_stores_a_new_hash() {
    let harness = Harness::new().await;
    let user = harness.user("root", "root@dockyards.dev").await;
    let token = harness.access_token(&user);

    let (status, _) = harness
        .post("/v1/users/root/password", &token, json!({"OldPassword": PASSWORD, "NewPassword": "fresh"}))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let stored = harness.client().get::<UserSpec>(None, "root").await.unwrap().unwrap();
    assert!(bcrypt::verify("fresh", &stored.spec.password).unwrap());
    assert!(!bcrypt::verify(PASSWORD, &stored.spec.password).unwrap());
}

#[tokio::test]
async fn password_change_is_limited_to_the_caller() {
    let harness = Harness::new().await;
    let user = harness.user("root", "root@dockyards.dev").await;
    harness.user("other", "other@dockyards.dev").await;

    let (status, _) = harness
        .post(
            "/v1/users/other/password",
            &harness.access_token(&user),
            json!({"oldPassword": PASSWORD, "newPassword": "fresh"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_new_password_is_rejected() {
    let harness = Harness::new().await;
    let user = harness.user("root", "root@dockyards.dev").await;

    let (status, body) = harness
        .post(
            "/v1/users/root/password",
            &harness.access_token(&user),
            json!({"oldPassword": PASSWORD, "newPassword": ""}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!body["message"].as_str().unwrap().contains(PASSWORD));
}
