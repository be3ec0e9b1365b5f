// crates/dockyards-api/tests/sign_up.rs
// ============================================================================
// Module: Sign-Up Tests
// Description: Public user registration behind the sign-up feature.
// Purpose: Verify feature gating, validation, and the stored user shape.
// Dependencies: dockyards-api, dockyards-core, tokio
// ============================================================================

//! Sign-up tests.

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
use dockyards_api::handlers::users::LOCAL_PROVIDER_ID;
use dockyards_core::Timestamp;
use dockyards_core::UserSpec;
use serde_json::json;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn sign_up_creates_a_local_user() {
    let harness = Harness::new().await;
    harness.enable_sign_up().await;

    let (status, body) = harness
        .send(
            Method::POST,
            "/v1/users",
            None,
            Some(json!({"email": "test@dockyards.dev", "password": "testing"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "test@dockyards.dev");
    assert_eq!(body["providerID"], "dockyards://");
    assert!(!body["id"].as_str().unwrap().is_empty());
    assert!(body.get("password").is_none());

    let name = body["name"].as_str().unwrap();
    assert!(name.starts_with("test-"));
    let created_at = Timestamp::parse(body["createdAt"].as_str().unwrap()).unwrap();
    assert!((Timestamp::now().unix_seconds() - created_at.unix_seconds()).abs() <= 1);

    let stored = harness.client().get::<UserSpec>(None, name).await.unwrap().unwrap();
    assert_eq!(stored.spec.provider_id.as_deref(), Some(LOCAL_PROVIDER_ID));
    assert!(bcrypt::verify("testing", &stored.spec.password).unwrap());
}

#[tokio::test]
async fn sign_up_is_hidden_without_the_feature() {
    let harness = Harness::new().await;
    let (status, _) = harness
        .send(
            Method::POST,
            "/v1/users",
            None,
            Some(json!({"email": "test@dockyards.dev", "password": "testing"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sign_up_rejects_a_registered_email() {
    let harness = Harness::new().await;
    harness.enable_sign_up().await;
    harness.user("root", "root@dockyards.dev").await;

    let (status, _) = harness
        .send(Method::POST, "/v1/users", None, Some(json!({"email": "root@dockyards.dev", "password": "x"})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn sign_up_validates_options() {
    let harness = Harness::new().await;
    harness.enable_sign_up().await;

    for body in [
        json!({"email": "not-an-email", "password": "testing"}),
        json!({"email": "test@dockyards.dev"}),
        json!({"password": "testing"}),
        json!({"email": "test@dockyards.dev", "password": "testing", "displayName": "x".repeat(300)}),
    ] {
        let (status, _) = harness.send(Method::POST, "/v1/users", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn sign_up_names_stay_unique_for_similar_emails() {
    let harness = Harness::new().await;
    harness.enable_sign_up().await;

    let (_, first) = harness
        .send(Method::POST, "/v1/users", None, Some(json!({"email": "Same@one.dev", "password": "testing"})))
        .await;
    let (_, second) = harness
        .send(Method::POST, "/v1/users", None, Some(json!({"email": "same@two.dev", "password": "testing"})))
        .await;
    assert_ne!(first["name"], second["name"]);
}
