// crates/dockyards-api/src/membership.rs
// ============================================================================
// Module: Dockyards Membership Resolver
// Description: Resolves the caller's role inside an organization.
// Purpose: Gate every organization-scoped operation on tenancy and role.
// Dependencies: dockyards-core
// ============================================================================

//! ## Overview
//! Organization-scoped handlers call [`authorize`] before touching any other
//! object. A missing organization and a non-member caller are
//! indistinguishable: both end in 401, so callers outside a tenant cannot
//! learn which organizations exist. Node pool updates split the check into
//! [`resolve`] and [`OrgAccess::permit`] so that a rename attempt by any
//! member is rejected as a validation failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockyards_core::Organization;
use dockyards_core::OrganizationSpec;
use dockyards_core::Role;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::policy::Operation;
use crate::policy::enforce;
use crate::state::ApiState;

// ============================================================================
// SECTION: Access
// ============================================================================

/// Organization loaded for an authorized caller.
#[derive(Debug, Clone)]
pub struct OrgAccess {
    /// Organization as read during authorization.
    pub organization: Organization,
    /// Caller's role in it.
    pub role: Role,
}

impl OrgAccess {
    /// Returns the tenant namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] when the organization has no namespace
    /// yet.
    pub fn namespace(&self) -> Result<&str, ApiError> {
        let namespace = self.organization.spec.namespace_ref.as_str();
        if namespace.is_empty() {
            return Err(ApiError::Internal(format!("organization {} has no namespace", self.organization.name())));
        }
        Ok(namespace)
    }

    /// Checks the resolved role against `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the role is insufficient.
    pub fn permit(&self, operation: Operation) -> Result<(), ApiError> {
        enforce(Some(self.role), operation)
    }
}

/// Returns the role of `user_uid` in `organization`.
#[must_use]
pub fn role_of(organization: &Organization, user_uid: &str) -> Option<Role> {
    organization.spec.member(user_uid).map(|member| member.role)
}

/// Loads `org_name` and resolves the caller's membership in it.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when the organization is missing or
/// the caller is not a member.
pub async fn resolve(state: &ApiState, user: &AuthenticatedUser, org_name: &str) -> Result<OrgAccess, ApiError> {
    let Some(organization) = state.client.get::<OrganizationSpec>(None, org_name).await? else {
        return Err(ApiError::unauthorized("organization not visible to caller"));
    };
    let role = role_of(&organization, user.uid())
        .ok_or_else(|| ApiError::unauthorized("organization not visible to caller"))?;
    Ok(OrgAccess {
        organization,
        role,
    })
}

/// Loads `org_name` and checks that the caller may run `operation` in it.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when the organization is missing, the
/// caller is not a member, or the role is insufficient.
pub async fn authorize(
    state: &ApiState,
    user: &AuthenticatedUser,
    org_name: &str,
    operation: Operation,
) -> Result<OrgAccess, ApiError> {
    let access = resolve(state, user, org_name).await?;
    access.permit(operation)?;
    Ok(access)
}
