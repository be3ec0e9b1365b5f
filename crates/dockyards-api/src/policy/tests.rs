// crates/dockyards-api/src/policy/tests.rs
// ============================================================================
// Module: Policy Engine Unit Tests
// Description: Role matrix assertions for organization-scoped operations.
// Purpose: Pin the tenancy table so changes to it are deliberate.
// Dependencies: dockyards-api, dockyards-core, proptest
// ============================================================================

//! ## Overview
//! Drives the policy table row by row, then checks totality properties over
//! arbitrary role/operation pairs.

#![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockyards_core::ALL_ROLES;
use dockyards_core::Role;
use proptest::prelude::*;

use super::ALL_OPERATIONS;
use super::Operation;
use super::enforce;
use super::is_allowed;
use crate::error::ApiError;

// ============================================================================
// SECTION: Matrix
// ============================================================================

/// Expected permissions as `(operation, [SuperUser, User, Reader])`.
const MATRIX: [(Operation, [bool; 3]); 18] = [
    (Operation::GetOrganization, [true, true, true]),
    (Operation::DeleteOrganization, [true, false, false]),
    (Operation::ListMembers, [true, true, true]),
    (Operation::DeleteMember, [true, false, false]),
    (Operation::ListInvitations, [true, false, false]),
    (Operation::CreateInvitation, [true, false, false]),
    (Operation::DeleteInvitation, [true, false, false]),
    (Operation::ListClusters, [true, true, true]),
    (Operation::GetCluster, [true, true, true]),
    (Operation::CreateCluster, [true, true, false]),
    (Operation::UpdateCluster, [true, true, false]),
    (Operation::DeleteCluster, [true, true, false]),
    (Operation::ListNodePools, [true, true, true]),
    (Operation::GetNodePool, [true, true, true]),
    (Operation::CreateNodePool, [true, true, false]),
    (Operation::UpdateNodePool, [true, true, false]),
    (Operation::DeleteNodePool, [true, true, false]),
    (Operation::ListNodes, [true, true, true]),
];

#[test]
fn matrix_matches_policy_table() {
    for (operation, expected) in MATRIX {
        for (role, allowed) in ALL_ROLES.into_iter().zip(expected) {
            assert_eq!(is_allowed(Some(role), operation), allowed, "{} {}", role, operation_index(operation));
        }
    }
}

#[test]
fn matrix_covers_every_operation() {
    for operation in ALL_OPERATIONS {
        assert!(MATRIX.iter().any(|(row, _)| *row == operation));
    }
}

#[test]
fn outsiders_are_always_denied() {
    for operation in ALL_OPERATIONS {
        assert!(!is_allowed(None, operation));
        assert!(matches!(enforce(None, operation), Err(ApiError::Unauthorized(_))));
    }
}

#[test]
fn super_user_may_do_everything() {
    for operation in ALL_OPERATIONS {
        assert!(enforce(Some(Role::SuperUser), operation).is_ok());
    }
}

/// Position of an operation in [`ALL_OPERATIONS`] for assertion messages.
fn operation_index(operation: Operation) -> usize {
    ALL_OPERATIONS.iter().position(|candidate| *candidate == operation).unwrap()
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn higher_roles_never_lose_permissions(op in 0 .. ALL_OPERATIONS.len(), role in 0 .. ALL_ROLES.len()) {
        let operation = ALL_OPERATIONS[op];
        let role = ALL_ROLES[role];
        if is_allowed(Some(role), operation) {
            for stronger in ALL_ROLES.into_iter().filter(|candidate| candidate.rank() < role.rank()) {
                prop_assert!(is_allowed(Some(stronger), operation));
            }
        }
    }
}
