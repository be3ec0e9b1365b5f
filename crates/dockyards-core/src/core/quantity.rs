// crates/dockyards-core/src/core/quantity.rs
// ============================================================================
// Module: Dockyards Resource Quantities
// Description: SI/IEC-suffixed resource quantities with canonical string forms.
// Purpose: Parse, compare, and canonicalize CPU, memory, and disk amounts.
// Dependencies: k8s-openapi, kube_quantity, serde, thiserror
// ============================================================================

//! ## Overview
//! Quantities follow the declarative-store grammar (`2`, `500m`, `3M`,
//! `4Gi`). Parsing is delegated to [`ParsedQuantity`], which reads the
//! store's own [`K8sQuantity`] wire type; [`Quantity`] only adds the
//! ordering, serde, and rounding behavior the API needs.
//!
//! Equality and ordering compare values, never lexemes. The canonical string
//! is the parser's rendering, so `2`, `3M`, and `4Gi` round-trip unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity as K8sQuantity;
use kube_quantity::ParsedQuantity;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted input length.
const MAX_QUANTITY_LENGTH: usize = 64;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Quantity parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// Empty input.
    #[error("quantity is empty")]
    Empty,
    /// Input exceeds the accepted length.
    #[error("quantity exceeds {MAX_QUANTITY_LENGTH} characters")]
    TooLong,
    /// Input does not match the quantity grammar.
    #[error("invalid quantity {input:?}: {reason}")]
    Invalid {
        /// Rejected input.
        input: String,
        /// Parser message.
        reason: String,
    },
}

// ============================================================================
// SECTION: Quantity
// ============================================================================

/// Parsed resource quantity.
///
/// # Invariants
/// - Equality and ordering compare values, so `1Gi == 1024Mi`.
#[derive(Debug, Clone)]
pub struct Quantity(ParsedQuantity);

impl Quantity {
    /// Parses a quantity string.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError`] when the input is empty, too long, or does
    /// not match the grammar.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(QuantityError::Empty);
        }
        if trimmed.len() > MAX_QUANTITY_LENGTH {
            return Err(QuantityError::TooLong);
        }
        ParsedQuantity::try_from(K8sQuantity(trimmed.to_string())).map(Self).map_err(|err| {
            QuantityError::Invalid {
                input: trimmed.to_string(),
                reason: err.to_string(),
            }
        })
    }

    /// Builds a plain integer quantity such as a CPU count.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError`] if the parser rejects the rendered integer.
    pub fn from_integer(value: i64) -> Result<Self, QuantityError> {
        Self::parse(&value.to_string())
    }

    /// Returns true when the value is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.to_bytes_f64().is_some_and(|value| value < 0.0)
    }

    /// Returns the value rounded up to whole units; `500m` becomes `1`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "Float-to-integer casts saturate.")]
    pub fn whole_units_ceil(&self) -> i64 {
        self.0.to_bytes_f64().map_or(0, |value| value.ceil() as i64)
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        self.0.to_string()
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl From<&Quantity> for K8sQuantity {
    fn from(value: &Quantity) -> Self {
        Self(value.to_canonical_string())
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

/// Accepts quantity strings and bare integers.
struct QuantityVisitor;

impl de::Visitor<'_> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a quantity string or integer")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Quantity, E> {
        Quantity::parse(value).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Quantity, E> {
        Quantity::from_integer(value).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Quantity, E> {
        Quantity::parse(&value.to_string()).map_err(E::custom)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
