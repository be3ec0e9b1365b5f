// crates/dockyards-core/src/core/role.rs
// ============================================================================
// Module: Dockyards Membership Roles
// Description: Closed set of organization membership roles.
// Purpose: Provide the role vocabulary shared by storage, policy, and views.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Roles are a closed enum. Parsing is exact and case-sensitive; any other
//! string is rejected so validation can report it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Role
// ============================================================================

/// Organization membership role.
///
/// Defaults to the least-privileged role.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Role {
    /// Full control, including member and invitation management.
    SuperUser,
    /// Read and write access to workload resources.
    User,
    /// Read-only access.
    #[default]
    Reader,
}

/// All roles in display order.
pub const ALL_ROLES: [Role; 3] = [Role::SuperUser, Role::User, Role::Reader];

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperUser => "SuperUser",
            Self::User => "User",
            Self::Reader => "Reader",
        }
    }

    /// Returns the display rank; lower ranks sort first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::SuperUser => 0,
            Self::User => 1,
            Self::Reader => 2,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string is not a known role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ALL_ROLES
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| UnknownRole(value.to_string()))
    }
}
