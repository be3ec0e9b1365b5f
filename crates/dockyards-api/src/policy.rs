// crates/dockyards-api/src/policy.rs
// ============================================================================
// Module: Dockyards Policy Engine
// Description: Role/operation matrix for organization-scoped requests.
// Purpose: Keep every tenancy decision in one auditable table.
// Dependencies: dockyards-core
// ============================================================================

//! ## Overview
//! [`allowed_roles`] is the whole policy: a pure lookup from an
//! organization-scoped [`Operation`] to the member roles that may perform
//! it. Callers that are not members of the organization never pass, and
//! every denial surfaces as 401. Global catalog reads are not listed here;
//! any authenticated caller may perform them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockyards_core::Role;

use crate::error::ApiError;

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Organization-scoped operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Read the organization.
    GetOrganization,
    /// Delete the organization.
    DeleteOrganization,
    /// List organization members.
    ListMembers,
    /// Revoke a membership.
    DeleteMember,
    /// List pending invitations.
    ListInvitations,
    /// Invite a user.
    CreateInvitation,
    /// Withdraw an invitation.
    DeleteInvitation,
    /// List clusters.
    ListClusters,
    /// Read a cluster.
    GetCluster,
    /// Create a cluster.
    CreateCluster,
    /// Update a cluster.
    UpdateCluster,
    /// Delete a cluster.
    DeleteCluster,
    /// List node pools of a cluster.
    ListNodePools,
    /// Read a node pool.
    GetNodePool,
    /// Create a node pool.
    CreateNodePool,
    /// Update a node pool.
    UpdateNodePool,
    /// Delete a node pool.
    DeleteNodePool,
    /// List nodes of a cluster.
    ListNodes,
}

/// Every organization-scoped operation.
pub const ALL_OPERATIONS: [Operation; 18] = [
    Operation::GetOrganization,
    Operation::DeleteOrganization,
    Operation::ListMembers,
    Operation::DeleteMember,
    Operation::ListInvitations,
    Operation::CreateInvitation,
    Operation::DeleteInvitation,
    Operation::ListClusters,
    Operation::GetCluster,
    Operation::CreateCluster,
    Operation::UpdateCluster,
    Operation::DeleteCluster,
    Operation::ListNodePools,
    Operation::GetNodePool,
    Operation::CreateNodePool,
    Operation::UpdateNodePool,
    Operation::DeleteNodePool,
    Operation::ListNodes,
];

// ============================================================================
// SECTION: Policy Table
// ============================================================================

/// Any member.
const READERS: &[Role] = &[Role::SuperUser, Role::User, Role::Reader];
/// Members allowed to change workloads.
const WRITERS: &[Role] = &[Role::SuperUser, Role::User];
/// Organization administrators.
const ADMINS: &[Role] = &[Role::SuperUser];

/// Returns the roles allowed to perform `operation`.
#[must_use]
pub const fn allowed_roles(operation: Operation) -> &'static [Role] {
    match operation {
        Operation::GetOrganization
        | Operation::ListMembers
        | Operation::ListClusters
        | Operation::GetCluster
        | Operation::ListNodePools
        | Operation::GetNodePool
        | Operation::ListNodes => READERS,
        Operation::CreateCluster
        | Operation::UpdateCluster
        | Operation::DeleteCluster
        | Operation::CreateNodePool
        | Operation::UpdateNodePool
        | Operation::DeleteNodePool => WRITERS,
        Operation::DeleteOrganization
        | Operation::DeleteMember
        | Operation::ListInvitations
        | Operation::CreateInvitation
        | Operation::DeleteInvitation => ADMINS,
    }
}

/// Returns true when a caller with `role` may perform `operation`.
///
/// `None` means the caller is not a member.
#[must_use]
pub fn is_allowed(role: Option<Role>, operation: Operation) -> bool {
    role.is_some_and(|role| allowed_roles(operation).contains(&role))
}

/// Enforces the policy.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when the role does not permit
/// `operation`.
pub fn enforce(role: Option<Role>, operation: Operation) -> Result<(), ApiError> {
    if is_allowed(role, operation) {
        Ok(())
    } else {
        Err(ApiError::unauthorized("operation not permitted for caller"))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
