// crates/dockyards-core/src/core/resources/catalog.rs
// ============================================================================
// Module: Dockyards Catalog Resources
// Description: Cluster templates and releases.
// Purpose: Model the read-only catalog published in the global namespace.
// Dependencies: serde, crate::core::{object, resources::node_pool}
// ============================================================================

//! ## Overview
//! Catalog objects live in the global namespace and are read-only through the
//! API. Defaults are marked with labels so they can be found by selector.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::object::EmptyStatus;
use crate::core::object::Object;
use crate::core::object::ResourceSpec;
use crate::core::resources::node_pool::NodePoolSpec;

// ============================================================================
// SECTION: Cluster Template
// ============================================================================

/// Named node pool blueprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolTemplate {
    /// Requested (user-visible) pool name.
    pub name: String,
    /// Pool spec.
    #[serde(default)]
    pub spec: NodePoolSpec,
}

/// Cluster template spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTemplateSpec {
    /// Node pools created for clusters using this template.
    #[serde(default)]
    pub node_pool_templates: Vec<NodePoolTemplate>,
}

impl ResourceSpec for ClusterTemplateSpec {
    const KIND: &'static str = "ClusterTemplate";
    const NAMESPACED: bool = true;
    type Status = EmptyStatus;
}

/// Stored cluster template.
pub type ClusterTemplate = Object<ClusterTemplateSpec>;

// ============================================================================
// SECTION: Release
// ============================================================================

/// Release spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSpec {
    /// Version ranges tracked by this release.
    #[serde(default)]
    pub ranges: Vec<String>,
    /// Release type, e.g. `KubernetesRelease`.
    #[serde(default, rename = "type")]
    pub release_type: String,
}

/// Release status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseStatus {
    /// Newest version matching the ranges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    /// All versions matching the ranges.
    #[serde(default)]
    pub versions: Vec<String>,
}

impl ResourceSpec for ReleaseSpec {
    const KIND: &'static str = "Release";
    const NAMESPACED: bool = true;
    type Status = ReleaseStatus;
}

/// Stored release.
pub type Release = Object<ReleaseSpec>;
