// crates/dockyards-api/src/handlers/invitations.rs
// ============================================================================
// Module: Invitation Handlers
// Description: Issue, list, revoke, and accept organization invitations.
// Purpose: Grow organization membership by email.
// Dependencies: axum, dockyards-core
// ============================================================================

//! ## Overview
//! Invitations live in the organization namespace and are owned by the
//! organization. A `SuperUser` issues and revokes them; the invited user
//! lists their own pending invitations by email and accepts one, which adds
//! them to the member list with the invited role and deletes the invitation.
//! Deletion is two-phase: the invitation stays visible to the organization
//! with `deletedAt` until its finalizer is released, but the invitee no
//! longer sees it. An invitation with a `duration` expires that long after
//! creation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Extension;
use axum::Json;
use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::State;
use axum::response::Response;
use dockyards_core::FINALIZER_DOCKYARDS;
use dockyards_core::IndexKey;
use dockyards_core::Invitation;
use dockyards_core::InvitationSpec;
use dockyards_core::LABEL_ORGANIZATION_NAME;
use dockyards_core::ListParams;
use dockyards_core::MemberReference;
use dockyards_core::ObjectMeta;
use dockyards_core::OrganizationSpec;
use dockyards_core::Timestamp;

use super::ApiResult;
use super::accepted_empty;
use super::created;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::membership::authorize;
use crate::policy::Operation;
use crate::projection::invitation_view;
use crate::state::ApiState;
use crate::types::InvitationOptions;
use crate::types::InvitationView;
use crate::validation::parse_body;
use crate::validation::parse_duration;
use crate::validation::parse_role;
use crate::validation::required;
use crate::validation::validate_email;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix for generated invitation names.
const INVITATION_PREFIX: &str = "invitation-";

// ============================================================================
// SECTION: Organization Scope
// ============================================================================

/// `GET /v1/orgs/{org}/invitations`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] unless the caller is a `SuperUser`.
pub async fn list_invitations(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(org): Path<String>,
) -> ApiResult<Json<Vec<InvitationView>>> {
    let access = authorize(&state, &user, &org, Operation::ListInvitations).await?;
    let invitations =
        state.client.list::<InvitationSpec>(&ListParams::in_namespace(access.namespace()?)).await?;
    Ok(Json(invitations.iter().map(invitation_view).collect()))
}

/// `POST /v1/orgs/{org}/invitations`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] unless the caller is a `SuperUser` and
/// [`ApiError::Validation`] for a bad email, role, or duration.
pub async fn create_invitation(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(org): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    let access = authorize(&state, &user, &org, Operation::CreateInvitation).await?;
    let options: InvitationOptions = parse_body(&body)?;
    let role = parse_role(required("role", options.role.as_deref())?)?;
    let email = required("email", options.email.as_deref())?;
    validate_email(email)?;
    if let Some(duration) = options.duration.as_deref() {
        parse_duration(duration)?;
    }

    let metadata = ObjectMeta {
        generate_name: Some(INVITATION_PREFIX.to_string()),
        namespace: Some(access.namespace()?.to_string()),
        ..ObjectMeta::default()
    }
    .with_owner(access.organization.owner_reference())
    .with_label(LABEL_ORGANIZATION_NAME, access.organization.name())
    .with_finalizer(FINALIZER_DOCKYARDS);
    let invitation = Invitation::new(metadata, InvitationSpec {
        email: email.to_string(),
        role,
        duration: options.duration.clone(),
    });
    let invitation = state.client.create(&invitation).await?;
    Ok(created(invitation_view(&invitation)))
}

/// `DELETE /v1/orgs/{org}/invitations/{name}`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] unless the caller is a `SuperUser` and
/// [`ApiError::NotFound`] when the invitation is absent. The invitation moves
/// to `Deleting` and is purged once its finalizer is released.
pub async fn delete_invitation(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, name)): Path<(String, String)>,
) -> ApiResult<Response> {
    let access = authorize(&state, &user, &org, Operation::DeleteInvitation).await?;
    state.client.delete::<InvitationSpec>(Some(access.namespace()?), &name).await?;
    Ok(accepted_empty())
}

// ============================================================================
// SECTION: Invitee Scope
// ============================================================================

/// `GET /v1/invitations`: pending invitations addressed to the caller.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when the store fails.
pub async fn list_own_invitations(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<InvitationView>>> {
    let params = ListParams::default().with_index(IndexKey::InvitationEmail(user.email().to_string()));
    let invitations = state.client.list::<InvitationSpec>(&params).await?;
    let now = Timestamp::now();
    Ok(Json(
        invitations
            .iter()
            .filter(|invitation| invitation.metadata.deletion_timestamp.is_none())
            .filter(|invitation| !is_expired(invitation, now))
            .map(invitation_view)
            .collect(),
    ))
}

/// `POST /v1/invitations/{org}/{name}`: accepts an invitation.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when the organization or invitation is
/// absent or addressed to someone else, [`ApiError::Validation`] when it
/// expired, and [`ApiError::Conflict`] when the organization changed
/// concurrently.
pub async fn accept_invitation(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, name)): Path<(String, String)>,
) -> ApiResult<Response> {
    let not_visible = || ApiError::unauthorized("invitation not visible to caller");
    let Some(mut organization) = state.client.get::<OrganizationSpec>(None, &org).await? else {
        return Err(not_visible());
    };
    let namespace = organization.spec.namespace_ref.clone();
    let Some(invitation) = state.client.get::<InvitationSpec>(Some(&namespace), &name).await? else {
        return Err(not_visible());
    };
    if invitation.spec.email != user.email() || invitation.metadata.deletion_timestamp.is_some() {
        return Err(not_visible());
    }
    if is_expired(&invitation, Timestamp::now()) {
        return Err(ApiError::validation("invitation has expired"));
    }

    if organization.spec.member(user.uid()).is_none() {
        organization.spec.member_refs.push(MemberReference {
            name: user.name().to_string(),
            uid: user.uid().to_string(),
            role: invitation.spec.role,
        });
        state.client.update(&organization).await?;
    }
    state.client.delete::<InvitationSpec>(Some(&namespace), &name).await?;
    Ok(accepted_empty())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when the invitation's duration has elapsed at `now`.
///
/// An unparseable stored duration counts as expired.
fn is_expired(invitation: &Invitation, now: Timestamp) -> bool {
    let Some(duration) = invitation.spec.duration.as_deref() else {
        return false;
    };
    let Some(created) = invitation.metadata.creation_timestamp else {
        return false;
    };
    parse_duration(duration).map_or(true, |duration| created.saturating_add(duration) <= now)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
