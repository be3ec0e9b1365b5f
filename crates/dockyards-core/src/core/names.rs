// crates/dockyards-core/src/core/names.rs
// ============================================================================
// Module: Dockyards Object Names
// Description: DNS-label name rules and random name suffixes.
// Purpose: Share name checks between the store and request validation.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! Object names are DNS labels: lower-case ASCII alphanumerics and hyphens,
//! starting with a letter, not ending with a hyphen, at most 63 characters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::Rng;
use rand::distributions::Alphanumeric;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum DNS-label length.
pub const MAX_DNS_LABEL_LENGTH: usize = 63;
/// Length of random suffixes appended to generated names.
pub const GENERATED_SUFFIX_LENGTH: usize = 5;

// ============================================================================
// SECTION: Name Rules
// ============================================================================

/// Returns true when `name` is a valid DNS label.
#[must_use]
pub fn is_dns_label(name: &str) -> bool {
    let bytes = name.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return false;
    };
    bytes.len() <= MAX_DNS_LABEL_LENGTH
        && first.is_ascii_lowercase()
        && *last != b'-'
        && bytes.iter().all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit() || *byte == b'-')
}

/// Returns a random lower-case alphanumeric suffix.
#[must_use]
pub fn random_suffix(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .take(length)
        .collect()
}

/// Returns `prefix` followed by a random suffix.
#[must_use]
pub fn generate_name(prefix: &str) -> String {
    format!("{prefix}{}", random_suffix(GENERATED_SUFFIX_LENGTH))
}
