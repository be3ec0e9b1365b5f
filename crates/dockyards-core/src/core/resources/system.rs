// crates/dockyards-core/src/core/resources/system.rs
// ============================================================================
// Module: Dockyards System Resources
// Description: Namespaces, feature flags, and opaque secrets.
// Purpose: Model the store's partitioning and bootstrap records.
// Dependencies: serde, crate::core::object
// ============================================================================

//! ## Overview
//! Namespaces partition namespaced kinds. Features and secrets live in the
//! global namespace; a feature is enabled by the existence of its object.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::object::EmptyStatus;
use crate::core::object::Object;
use crate::core::object::ResourceSpec;

// ============================================================================
// SECTION: Namespace
// ============================================================================

/// Namespace spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSpec {}

impl ResourceSpec for NamespaceSpec {
    const KIND: &'static str = "Namespace";
    const NAMESPACED: bool = false;
    type Status = EmptyStatus;
}

/// Stored namespace.
pub type Namespace = Object<NamespaceSpec>;

// ============================================================================
// SECTION: Feature
// ============================================================================

/// Feature flag spec; presence enables the feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {}

impl ResourceSpec for FeatureSpec {
    const KIND: &'static str = "Feature";
    const NAMESPACED: bool = true;
    type Status = EmptyStatus;
}

/// Stored feature flag.
pub type Feature = Object<FeatureSpec>;

// ============================================================================
// SECTION: Secret
// ============================================================================

/// Opaque secret spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretSpec {
    /// Base64-encoded values.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl ResourceSpec for SecretSpec {
    const KIND: &'static str = "Secret";
    const NAMESPACED: bool = true;
    type Status = EmptyStatus;
}

/// Stored secret.
pub type Secret = Object<SecretSpec>;
