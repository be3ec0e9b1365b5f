// crates/dockyards-api/tests/authz.rs
// ============================================================================
// Module: Authorization Matrix Tests
// Description: Role and tenancy checks across every organization route.
// Purpose: Hold the role table for each route under each role.
// Dependencies: dockyards-api, dockyards-core, tokio
// ============================================================================

//! Tenancy isolation and role matrix tests.

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
use common::Tenant;
use dockyards_core::NodePoolSpec;
use dockyards_core::Role;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Caller identity within the tenant fixture.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Caller {
    /// SuperUser member.
    SuperUser,
    /// User member.
    User,
    /// Reader member.
    Reader,
    /// Member of another organization.
    Outsider,
}

const CALLERS: [Caller; 4] = [Caller::SuperUser, Caller::User, Caller::Reader, Caller::Outsider];

/// One route under test.
struct Case {
    method: Method,
    uri: &'static str,
    body: Option<Value>,
    allowed: &'static [Role],
}

const ALL: &[Role] = &[Role::SuperUser, Role::User, Role::Reader];
const WRITERS: &[Role] = &[Role::SuperUser, Role::User];
const ADMINS: &[Role] = &[Role::SuperUser];

fn cases() -> Vec<Case> {
    vec![
        Case {
            method: Method::GET,
            uri: "/v1/orgs/acme",
            body: None,
            allowed: ALL,
        },
        Case {
            method: Method::DELETE,
            uri: "/v1/orgs/acme",
            body: None,
            allowed: ADMINS,
        },
        Case {
            method: Method::GET,
            uri: "/v1/orgs/acme/members",
            body: None,
            allowed: ALL,
        },
        Case {
            method: Method::DELETE,
            uri: "/v1/orgs/acme/members/viewer",
            body: None,
            allowed: ADMINS,
        },
        Case {
            method: Method::GET,
            uri: "/v1/orgs/acme/invitations",
            body: None,
            allowed: ADMINS,
        },
        Case {
            method: Method::POST,
            uri: "/v1/orgs/acme/invitations",
            body: Some(json!({"email": "other@dockyards.dev", "role": "User"})),
            allowed: ADMINS,
        },
        Case {
            method: Method::DELETE,
            uri: "/v1/orgs/acme/invitations/pending",
            body: None,
            allowed: ADMINS,
        },
        Case {
            method: Method::GET,
            uri: "/v1/orgs/acme/clusters",
            body: None,
            allowed: ALL,
        },
        Case {
            method: Method::POST,
            uri: "/v1/orgs/acme/clusters",
            body: Some(json!({"name": "fresh", "version": "v1.30.0", "noDefaultNodePools": true})),
            allowed: WRITERS,
        },
        Case {
            method: Method::GET,
            uri: "/v1/orgs/acme/clusters/c",
            body: None,
            allowed: ALL,
        },
        Case {
            method: Method::PATCH,
            uri: "/v1/orgs/acme/clusters/c",
            body: Some(json!({"version": "v1.31.0"})),
            allowed: WRITERS,
        },
        Case {
            method: Method::DELETE,
            uri: "/v1/orgs/acme/clusters/c",
            body: None,
            allowed: WRITERS,
        },
        Case {
            method: Method::GET,
            uri: "/v1/orgs/acme/clusters/c/node-pools",
            body: None,
            allowed: ALL,
        },
        Case {
            method: Method::POST,
            uri: "/v1/orgs/acme/clusters/c/node-pools",
            body: Some(json!({"name": "extra", "quantity": 1})),
            allowed: WRITERS,
        },
        Case {
            method: Method::GET,
            uri: "/v1/orgs/acme/clusters/c/node-pools/p",
            body: None,
            allowed: ALL,
        },
        Case {
            method: Method::PATCH,
            uri: "/v1/orgs/acme/clusters/c/node-pools/p",
            body: Some(json!({"quantity": 2})),
            allowed: WRITERS,
        },
        Case {
            method: Method::DELETE,
            uri: "/v1/orgs/acme/clusters/c/node-pools/p",
            body: None,
            allowed: WRITERS,
        },
        Case {
            method: Method::GET,
            uri: "/v1/orgs/acme/clusters/c/nodes",
            body: None,
            allowed: ALL,
        },
    ]
}

/// Seeds the tenant plus cluster `c`, pool `p`, and invitation `pending`.
async fn seeded() -> (Harness, Tenant) {
    let harness = Harness::new().await;
    let tenant = Tenant::seed(&harness).await;
    let cluster = harness.cluster(&tenant.organization, "c").await;
    let pool = harness.node_pool(&cluster, "p", NodePoolSpec::default()).await;
    harness.node(&pool, &cluster, "c-p-0", Some("KubeletReady")).await;
    harness.invitation(&tenant.organization, "pending", "invitee@dockyards.dev", Role::Reader, None).await;
    (harness, tenant)
}

fn token_for(harness: &Harness, tenant: &Tenant, caller: Caller) -> String {
    let user = match caller {
        Caller::SuperUser => &tenant.super_user,
        Caller::User => &tenant.user,
        Caller::Reader => &tenant.reader,
        Caller::Outsider => &tenant.outsider,
    };
    harness.access_token(user)
}

const fn role_of(caller: Caller) -> Option<Role> {
    match caller {
        Caller::SuperUser => Some(Role::SuperUser),
        Caller::User => Some(Role::User),
        Caller::Reader => Some(Role::Reader),
        Caller::Outsider => None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn role_matrix_holds_for_every_route_and_role() {
    for case in cases() {
        for caller in CALLERS {
            let (harness, tenant) = seeded().await;
            let token = token_for(&harness, &tenant, caller);
            let (status, body) = harness.send(case.method.clone(), case.uri, Some(&token), case.body.clone()).await;
            let allowed = role_of(caller).is_some_and(|role| case.allowed.contains(&role));
            if allowed {
                assert!(status.is_success(), "{} {} expected success, got {status}", case.method, case.uri);
            } else {
                assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", case.method, case.uri);
                assert_eq!(body, Value::Null, "{} {} leaked a body", case.method, case.uri);
            }
        }
    }
}

#[tokio::test]
async fn outsiders_cannot_tell_missing_resources_from_hidden_ones() {
    let (harness, tenant) = seeded().await;
    let token = harness.access_token(&tenant.outsider);
    for uri in [
        "/v1/orgs/acme/clusters/c",
        "/v1/orgs/acme/clusters/missing",
        "/v1/orgs/missing/clusters/c",
        "/v1/orgs/acme/clusters/c/node-pools/p",
        "/v1/orgs/acme/clusters/c/node-pools/missing",
    ] {
        let (status, body) = harness.get(uri, &token).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body, Value::Null, "{uri}");
    }
}

#[tokio::test]
async fn members_see_not_found_for_missing_resources() {
    let (harness, tenant) = seeded().await;
    let token = harness.access_token(&tenant.reader);
    let (status, _) = harness.get("/v1/orgs/acme/clusters/missing", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = harness.get("/v1/orgs/acme/clusters/c/node-pools/missing", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn organization_list_only_shows_memberships() {
    let (harness, tenant) = seeded().await;
    let (status, body) = harness.get("/v1/orgs", &harness.access_token(&tenant.reader)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|org| org["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["acme"]);

    let (_, body) = harness.get("/v1/orgs", &harness.access_token(&tenant.outsider)).await;
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|org| org["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["globex"]);
}

#[tokio::test]
async fn protected_routes_require_a_valid_access_token() {
    let (harness, tenant) = seeded().await;
    let (status, body) = harness.send(Method::GET, "/v1/orgs", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, Value::Null);

    let (status, _) = harness.get("/v1/orgs", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let refresh = harness.refresh_token(&tenant.super_user);
    let (status, _) = harness.get("/v1/orgs", &refresh).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn catalog_routes_accept_any_authenticated_user() {
    let (harness, tenant) = seeded().await;
    let token = harness.access_token(&tenant.outsider);
    let (status, _) = harness.get("/v1/cluster-templates", &token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = harness.get("/v1/releases", &token).await;
    assert_eq!(status, StatusCode::OK);
}
