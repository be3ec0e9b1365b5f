// crates/dockyards-api/src/handlers/members.rs
// ============================================================================
// Module: Member Handlers
// Description: List and revoke organization memberships.
// Purpose: Enforce the last-SuperUser rule on revocation.
// Dependencies: axum, dockyards-core
// ============================================================================

//! ## Overview
//! Membership lives in the organization's member list; revoking a member
//! rewrites that list with a versioned update and never touches the user.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Extension;
use axum::Json;
use axum::extract::Path;
use axum::extract::State;
use axum::response::Response;
use dockyards_core::Role;

use super::ApiResult;
use super::accepted_empty;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::membership::authorize;
use crate::policy::Operation;
use crate::projection::member_views;
use crate::state::ApiState;
use crate::types::MemberView;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /v1/orgs/{org}/members`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for non-members.
pub async fn list_members(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(org): Path<String>,
) -> ApiResult<Json<Vec<MemberView>>> {
    let access = authorize(&state, &user, &org, Operation::ListMembers).await?;
    Ok(Json(member_views(&access.organization)))
}

/// `DELETE /v1/orgs/{org}/members/{name}`.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for a non-member, [`ApiError::Validation`]
/// when the last `SuperUser` would be removed, and [`ApiError::Conflict`]
/// when the organization changed concurrently.
pub async fn delete_member(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, name)): Path<(String, String)>,
) -> ApiResult<Response> {
    let access = authorize(&state, &user, &org, Operation::DeleteMember).await?;
    let mut organization = access.organization;
    let Some(position) = organization.spec.member_refs.iter().position(|member| member.name == name) else {
        return Err(ApiError::NotFound(format!("member {name}")));
    };
    let removed = organization.spec.member_refs.remove(position);
    if removed.role == Role::SuperUser && organization.spec.count_role(Role::SuperUser) == 0 {
        return Err(ApiError::validation("an organization must keep at least one SuperUser"));
    }
    state.client.update(&organization).await?;
    Ok(accepted_empty())
}
