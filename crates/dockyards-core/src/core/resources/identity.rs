// crates/dockyards-core/src/core/resources/identity.rs
// ============================================================================
// Module: Dockyards Identity Resources
// Description: Users, organizations, embedded memberships, and invitations.
// Purpose: Model tenancy and identity records.
// Dependencies: serde, crate::core::{meta, object, role}
// ============================================================================

//! ## Overview
//! Users and organizations are cluster-scoped. Membership is embedded in the
//! organization as a list of member references keyed by user uid; an
//! organization's workload objects live in the namespace named by
//! [`OrganizationSpec::namespace_ref`]. Invitations live in that namespace
//! and are owned by the organization.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::meta::Condition;
use crate::core::object::EmptyStatus;
use crate::core::object::Object;
use crate::core::object::ResourceSpec;
use crate::core::role::Role;

// ============================================================================
// SECTION: User
// ============================================================================

/// User spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSpec {
    /// Login email address.
    pub email: String,
    /// bcrypt password hash.
    #[serde(default)]
    pub password: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Authentication origin marker.
    #[serde(default, rename = "providerID", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

/// User status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    /// True once the email address was verified.
    #[serde(default)]
    pub email_verified: bool,
    /// Reported conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl ResourceSpec for UserSpec {
    const KIND: &'static str = "User";
    const NAMESPACED: bool = false;
    type Status = UserStatus;
}

/// Stored user.
pub type User = Object<UserSpec>;

// ============================================================================
// SECTION: Organization
// ============================================================================

/// Member entry embedded in an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberReference {
    /// User name.
    pub name: String,
    /// User uid.
    pub uid: String,
    /// Membership role.
    pub role: Role,
}

/// Organization spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSpec {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Members; a user appears at most once.
    #[serde(default)]
    pub member_refs: Vec<MemberReference>,
    /// Tenant namespace holding the organization's workload objects.
    #[serde(default)]
    pub namespace_ref: String,
}

impl OrganizationSpec {
    /// Returns the member entry for a user uid.
    #[must_use]
    pub fn member(&self, user_uid: &str) -> Option<&MemberReference> {
        self.member_refs.iter().find(|member| member.uid == user_uid)
    }

    /// Counts members holding `role`.
    #[must_use]
    pub fn count_role(&self, role: Role) -> usize {
        self.member_refs.iter().filter(|member| member.role == role).count()
    }
}

/// Organization status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationStatus {
    /// Reported conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl ResourceSpec for OrganizationSpec {
    const KIND: &'static str = "Organization";
    const NAMESPACED: bool = false;
    type Status = OrganizationStatus;
}

/// Stored organization.
pub type Organization = Object<OrganizationSpec>;

// ============================================================================
// SECTION: Invitation
// ============================================================================

/// Invitation spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSpec {
    /// Invited email address.
    pub email: String,
    /// Role granted on acceptance.
    #[serde(default)]
    pub role: Role,
    /// Validity window in `<int>(h|m|s)` form, measured from creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl ResourceSpec for InvitationSpec {
    const KIND: &'static str = "Invitation";
    const NAMESPACED: bool = true;
    type Status = EmptyStatus;
}

/// Stored invitation.
pub type Invitation = Object<InvitationSpec>;
