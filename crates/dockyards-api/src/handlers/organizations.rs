// crates/dockyards-api/src/handlers/organizations.rs
// ============================================================================
// Module: Organization Handlers
// Description: List, create, read, and delete organizations.
// Purpose: Provision tenants and their namespaces.
// Dependencies: axum, dockyards-core
// ============================================================================

//! ## Overview
//! Creating an organization provisions a namespace with a generated name,
//! creates the organization pointing at it with the caller as its only
//! `SuperUser`, then makes the namespace a dependent of the organization so
//! both go away together.

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
use dockyards_core::ListParams;
use dockyards_core::MemberReference;
use dockyards_core::Namespace;
use dockyards_core::NamespaceSpec;
use dockyards_core::ObjectMeta;
use dockyards_core::Organization;
use dockyards_core::OrganizationSpec;
use dockyards_core::Role;
use dockyards_core::StoreError;

use super::ApiResult;
use super::accepted_empty;
use super::created;
use crate::audit::SecurityAuditEvent;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::membership::authorize;
use crate::policy::Operation;
use crate::projection::organization_view;
use crate::state::ApiState;
use crate::types::OrganizationOptions;
use crate::types::OrganizationView;
use crate::validation::parse_body;
use crate::validation::required;
use crate::validation::validate_display_name;
use crate::validation::validate_name;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix for generated tenant namespace names.
const NAMESPACE_PREFIX: &str = "org-";

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /v1/orgs`: organizations the caller belongs to.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when the store fails.
pub async fn list_organizations(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<OrganizationView>>> {
    let organizations = state.client.list::<OrganizationSpec>(&ListParams::default()).await?;
    Ok(Json(
        organizations
            .iter()
            .filter(|organization| organization.spec.member(user.uid()).is_some())
            .map(organization_view)
            .collect(),
    ))
}

/// `POST /v1/orgs`: creates an organization owned by the caller.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for bad options and
/// [`ApiError::Conflict`] when the name is taken.
pub async fn create_organization(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> ApiResult<Response> {
    let options: OrganizationOptions = parse_body(&body)?;
    let name = required("name", options.name.as_deref())?;
    validate_name("name", name)?;
    validate_display_name(options.display_name.as_deref())?;
    if state.client.get::<OrganizationSpec>(None, name).await?.is_some() {
        return Err(ApiError::Conflict(format!("organization {name} already exists")));
    }

    let namespace = Namespace::new(
        ObjectMeta {
            generate_name: Some(NAMESPACE_PREFIX.to_string()),
            ..ObjectMeta::default()
        },
        NamespaceSpec::default(),
    );
    let namespace = state.client.create(&namespace).await?;

    let organization = Organization::new(
        ObjectMeta::named(name).with_finalizer(FINALIZER_DOCKYARDS),
        OrganizationSpec {
            display_name: options.display_name.clone(),
            member_refs: vec![MemberReference {
                name: user.name().to_string(),
                uid: user.uid().to_string(),
                role: Role::SuperUser,
            }],
            namespace_ref: namespace.name().to_string(),
        },
    );
    let organization = match state.client.create(&organization).await {
        Ok(organization) => organization,
        Err(err) => {
            discard_namespace(&state, namespace.name()).await;
            return Err(match err {
                StoreError::AlreadyExists(message) => ApiError::Conflict(message),
                other => other.into(),
            });
        }
    };

    let owner = organization.owner_reference();
    state
        .client
        .patch::<NamespaceSpec, _>(None, namespace.name(), move |namespace| {
            namespace.metadata.owner_references.push(owner);
        })
        .await?;
    Ok(created(organization_view(&organization)))
}

/// `GET /v1/orgs/{org}`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for non-members.
pub async fn get_organization(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(org): Path<String>,
) -> ApiResult<Json<OrganizationView>> {
    let access = authorize(&state, &user, &org, Operation::GetOrganization).await?;
    Ok(Json(organization_view(&access.organization)))
}

/// `DELETE /v1/orgs/{org}`: two-phase delete, `SuperUser` only.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] unless the caller is a `SuperUser`.
pub async fn delete_organization(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(org): Path<String>,
) -> ApiResult<Response> {
    authorize(&state, &user, &org, Operation::DeleteOrganization).await?;
    state.client.delete::<OrganizationSpec>(None, &org).await?;
    Ok(accepted_empty())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Removes a namespace left behind by a failed organization create.
async fn discard_namespace(state: &ApiState, namespace: &str) {
    if let Err(err) = state.client.delete::<NamespaceSpec>(None, namespace).await {
        state.audit.record_security(&SecurityAuditEvent::new(
            "namespace_cleanup_failed",
            Some(format!("{namespace}: {err}")),
        ));
    }
}
