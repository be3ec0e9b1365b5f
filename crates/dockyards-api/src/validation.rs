// crates/dockyards-api/src/validation.rs
// ============================================================================
// Module: Dockyards Validator
// Description: Semantic checks applied to request options before any write.
// Purpose: Turn untrusted option payloads into validated values or 422s.
// Dependencies: axum, bcrypt, serde_json, tokio, dockyards-core
// ============================================================================

//! ## Overview
//! Request bodies arrive as raw bytes and are decoded only after the caller
//! has been authorized, so a caller without permission learns nothing from
//! validation messages. Every rule here fails with
//! [`ApiError::Validation`]; messages name the offending field but never echo
//! submitted secrets.
//!
//! Password checks run bcrypt on the blocking pool.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use axum::body::Bytes;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dockyards_core::MAX_DNS_LABEL_LENGTH;
use dockyards_core::Quantity;
use dockyards_core::Role;
use dockyards_core::StorageResource;
use dockyards_core::is_dns_label;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::types::NodePoolOptions;
use crate::types::StorageResourceOptions;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Host path storage type.
pub const STORAGE_TYPE_HOST_PATH: &str = "HostPath";
/// Accepted storage resource types; empty means unspecified.
pub const STORAGE_TYPES: [&str; 2] = [STORAGE_TYPE_HOST_PATH, ""];
/// Longest accepted email address.
const MAX_EMAIL_LENGTH: usize = 254;
/// bcrypt only hashes the first 72 bytes.
const MAX_PASSWORD_BYTES: usize = 72;
/// Longest accepted duration string.
const MAX_DURATION_LENGTH: usize = 20;
/// Longest accepted display name.
const MAX_DISPLAY_NAME_LENGTH: usize = 256;
/// Longest accepted version string.
const MAX_VERSION_LENGTH: usize = 64;

// ============================================================================
// SECTION: Bodies
// ============================================================================

/// Decodes a JSON body; an empty body decodes as `{}`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the body is not the expected shape.
pub fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) { b"{}" } else { body };
    serde_json::from_slice(raw).map_err(|err| {
        ApiError::validation(format!("invalid request body at line {} column {}", err.line(), err.column()))
    })
}

// ============================================================================
// SECTION: Scalars
// ============================================================================

/// Requires a present field.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the field is absent.
pub fn required<'a, T: ?Sized>(field: &str, value: Option<&'a T>) -> Result<&'a T, ApiError> {
    value.ok_or_else(|| ApiError::validation(format!("{field} is required")))
}

/// Checks a DNS-label name.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for empty, oversized, or malformed names.
pub fn validate_name(field: &str, name: &str) -> Result<(), ApiError> {
    if is_dns_label(name) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "{field} must be a lower-case dns label of at most {MAX_DNS_LABEL_LENGTH} characters"
        )))
    }
}

/// Parses a member role.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for anything but `SuperUser`, `User`, or
/// `Reader`.
pub fn parse_role(role: &str) -> Result<Role, ApiError> {
    role.parse().map_err(|_| ApiError::validation("role must be one of SuperUser, User, Reader"))
}

/// Parses a duration of the form `<int>(h|m|s)`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the grammar does not match.
pub fn parse_duration(value: &str) -> Result<Duration, ApiError> {
    let invalid = || ApiError::validation("duration must match <int>(h|m|s)");
    if value.is_empty() || value.len() > MAX_DURATION_LENGTH || !value.is_ascii() {
        return Err(invalid());
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }
    let amount: u64 = digits.parse().map_err(|_| invalid())?;
    let seconds = match unit {
        "h" => amount.checked_mul(3600),
        "m" => amount.checked_mul(60),
        "s" => Some(amount),
        _ => None,
    }
    .ok_or_else(invalid)?;
    Ok(Duration::from_secs(seconds))
}

/// Checks an email address shape.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the address is empty or malformed.
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = email.len() <= MAX_EMAIL_LENGTH
        && !email.chars().any(char::is_whitespace)
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        });
    if valid { Ok(()) } else { Err(ApiError::validation("email is invalid")) }
}

/// Checks a new password.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the password is empty or too long.
pub fn validate_password(field: &str, password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ApiError::validation(format!("{field} exceeds {MAX_PASSWORD_BYTES} bytes")));
    }
    Ok(())
}

/// Checks an optional display name.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the name is too long.
pub fn validate_display_name(display_name: Option<&str>) -> Result<(), ApiError> {
    match display_name {
        Some(name) if name.chars().count() > MAX_DISPLAY_NAME_LENGTH => {
            Err(ApiError::validation("displayName is too long"))
        }
        _ => Ok(()),
    }
}

/// Checks a cluster version string.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the version is empty, too long, or
/// contains whitespace.
pub fn validate_version(version: &str) -> Result<(), ApiError> {
    if version.is_empty()
        || version.len() > MAX_VERSION_LENGTH
        || version.chars().any(|ch| ch.is_whitespace() || ch.is_control())
    {
        return Err(ApiError::validation("version is invalid"));
    }
    Ok(())
}

// ============================================================================
// SECTION: Node Pools
// ============================================================================

/// Whether options create a pool or patch an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePoolIntent {
    /// A new pool; `name` is required.
    Create,
    /// A patch; `name` is forbidden.
    Update,
}

/// Validated node pool fields; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePoolChanges {
    /// Requested (user-visible) pool name; only on create.
    pub name: Option<String>,
    /// Replica count.
    pub replicas: Option<i32>,
    /// CPU quantity.
    pub cpu: Option<Quantity>,
    /// Memory quantity.
    pub memory: Option<Quantity>,
    /// Disk quantity.
    pub storage: Option<Quantity>,
    /// Control plane flag.
    pub control_plane: Option<bool>,
    /// Load balancer flag.
    pub load_balancer: Option<bool>,
    /// Control plane components only flag.
    pub control_plane_components_only: Option<bool>,
    /// Full replacement of storage resources.
    pub storage_resources: Option<Vec<StorageResource>>,
}

/// Validates node pool options.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when any field breaks its rule,
/// including any `name` on update.
pub fn validate_node_pool(
    options: &NodePoolOptions,
    intent: NodePoolIntent,
    max_replicas: u32,
) -> Result<NodePoolChanges, ApiError> {
    let name = match (intent, options.name.as_deref()) {
        (NodePoolIntent::Update, Some(_)) => {
            return Err(ApiError::validation("node pool name is immutable"));
        }
        (NodePoolIntent::Update, None) => None,
        (NodePoolIntent::Create, name) => {
            let name = required("name", name)?;
            validate_name("name", name)?;
            Some(name.to_string())
        }
    };
    let replicas = options.quantity.map(|quantity| validate_replicas(quantity, max_replicas)).transpose()?;
    let cpu = options.cpu_count.map(cpu_quantity).transpose()?;
    let memory = options.ram_size.as_deref().map(|value| size_quantity("ramSize", value)).transpose()?;
    let storage = options.disk_size.as_deref().map(|value| size_quantity("diskSize", value)).transpose()?;
    let storage_resources = options
        .storage_resources
        .as_deref()
        .map(validate_storage_resources)
        .transpose()?;
    Ok(NodePoolChanges {
        name,
        replicas,
        cpu,
        memory,
        storage,
        control_plane: options.control_plane,
        load_balancer: options.load_balancer,
        control_plane_components_only: options.control_plane_components_only,
        storage_resources,
    })
}

/// Checks a replica count against `[0, max_replicas]`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when out of range.
pub fn validate_replicas(quantity: i64, max_replicas: u32) -> Result<i32, ApiError> {
    if quantity < 0 || quantity > i64::from(max_replicas) {
        return Err(ApiError::validation(format!("quantity must be between 0 and {max_replicas}")));
    }
    i32::try_from(quantity).map_err(|_| ApiError::validation("quantity is out of range"))
}

/// Converts a CPU count into a quantity.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for negative counts.
pub fn cpu_quantity(count: i64) -> Result<Quantity, ApiError> {
    if count < 0 {
        return Err(ApiError::validation("cpuCount must not be negative"));
    }
    Quantity::from_integer(count).map_err(|_| ApiError::validation("cpuCount is out of range"))
}

/// Parses a memory or disk size.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the string does not parse or is
/// negative.
pub fn size_quantity(field: &str, value: &str) -> Result<Quantity, ApiError> {
    let quantity: Quantity =
        value.parse().map_err(|_| ApiError::validation(format!("{field} is not a valid quantity")))?;
    if quantity.is_negative() {
        return Err(ApiError::validation(format!("{field} must not be negative")));
    }
    Ok(quantity)
}

/// Validates storage resource entries.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when an entry has a bad name, quantity,
/// or type, or when names repeat.
pub fn validate_storage_resources(
    entries: &[StorageResourceOptions],
) -> Result<Vec<StorageResource>, ApiError> {
    let mut validated: Vec<StorageResource> = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = required("storageResources.name", entry.name.as_ref())?;
        validate_name("storageResources.name", name)?;
        if validated.iter().any(|existing| existing.name == *name) {
            return Err(ApiError::validation(format!("storage resource {name} is duplicated")));
        }
        let quantity = required("storageResources.quantity", entry.quantity.as_ref())?;
        let quantity = size_quantity("storageResources.quantity", quantity)?;
        let storage_type = entry.storage_type.clone().unwrap_or_default();
        if !STORAGE_TYPES.contains(&storage_type.as_str()) {
            return Err(ApiError::validation("storageResources.type is not supported"));
        }
        validated.push(StorageResource {
            name: name.clone(),
            quantity,
            storage_type,
        });
    }
    Ok(validated)
}

// ============================================================================
// SECTION: Passwords
// ============================================================================

/// Hashes a password with bcrypt on the blocking pool.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when hashing fails.
pub async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .map_err(|err| ApiError::Internal(err.to_string()))
}

/// Hashes a random throwaway password at `cost`.
///
/// Login verifies against this hash when no user has the given email, so
/// unknown and known emails cost the same bcrypt work.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when hashing fails.
pub async fn unknown_user_hash(cost: u32) -> Result<String, ApiError> {
    let filler: [u8; 24] = rand::random();
    hash_password(STANDARD.encode(filler), cost).await
}

/// Verifies a password against a stored bcrypt hash on the blocking pool.
///
/// Malformed stored hashes verify as false.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when the blocking task fails.
pub async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
