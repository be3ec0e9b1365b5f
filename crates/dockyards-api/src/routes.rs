// crates/dockyards-api/src/routes.rs
// ============================================================================
// Module: Dockyards Route Registry
// Description: Binds every URL and method to its handler.
// Purpose: Keep the public/protected split in one table.
// Dependencies: axum
// ============================================================================

//! ## Overview
//! Public routes (sign-up, login, refresh) carry their own credential checks.
//! Every other route sits behind [`require_user`]. All routes are audited and
//! share one request body cap.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;

use crate::audit::record_requests;
use crate::auth::require_user;
use crate::handlers::catalog;
use crate::handlers::clusters;
use crate::handlers::invitations;
use crate::handlers::members;
use crate::handlers::node_pools;
use crate::handlers::nodes;
use crate::handlers::organizations;
use crate::handlers::session;
use crate::handlers::users;
use crate::state::ApiState;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the complete API router.
pub fn router(state: ApiState) -> Router {
    let max_body_bytes = state.settings.max_body_bytes;
    public_routes()
        .merge(protected_routes(&state))
        .route_layer(from_fn_with_state(state.clone(), record_requests))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Routes reachable without an access token.
fn public_routes() -> Router<ApiState> {
    Router::new()
        .route("/v1/users", post(users::sign_up))
        .route("/v1/login", post(session::login))
        .route("/v1/refresh", post(session::refresh))
}

/// Routes that require an access token.
fn protected_routes(state: &ApiState) -> Router<ApiState> {
    Router::new()
        .route("/v1/whoami", get(users::whoami))
        .route("/v1/users/{name}/password", post(users::change_password))
        .route("/v1/cluster-templates", get(catalog::list_cluster_templates))
        .route("/v1/releases", get(catalog::list_releases))
        .route("/v1/invitations", get(invitations::list_own_invitations))
        .route("/v1/invitations/{org}/{name}", post(invitations::accept_invitation))
        .route("/v1/orgs", get(organizations::list_organizations).post(organizations::create_organization))
        .route("/v1/orgs/{org}", get(organizations::get_organization).delete(organizations::delete_organization))
        .route("/v1/orgs/{org}/members", get(members::list_members))
        .route("/v1/orgs/{org}/members/{name}", delete(members::delete_member))
        .route(
            "/v1/orgs/{org}/invitations",
            get(invitations::list_invitations).post(invitations::create_invitation),
        )
        .route("/v1/orgs/{org}/invitations/{name}", delete(invitations::delete_invitation))
        .route("/v1/orgs/{org}/clusters", get(clusters::list_clusters).post(clusters::create_cluster))
        .route(
            "/v1/orgs/{org}/clusters/{cluster}",
            get(clusters::get_cluster).patch(clusters::update_cluster).delete(clusters::delete_cluster),
        )
        .route(
            "/v1/orgs/{org}/clusters/{cluster}/node-pools",
            get(node_pools::list_node_pools).post(node_pools::create_node_pool),
        )
        .route(
            "/v1/orgs/{org}/clusters/{cluster}/node-pools/{name}",
            get(node_pools::get_node_pool)
                .patch(node_pools::update_node_pool)
                .delete(node_pools::delete_node_pool),
        )
        .route("/v1/orgs/{org}/clusters/{cluster}/nodes", get(nodes::list_nodes))
        .route_layer(from_fn_with_state(state.clone(), require_user))
}
