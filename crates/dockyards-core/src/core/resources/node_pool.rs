// crates/dockyards-core/src/core/resources/node_pool.rs
// ============================================================================
// Module: Dockyards Node Pool Resources
// Description: Node pool spec, resource lists, and storage resources.
// Purpose: Model replica groups of identically-sized nodes.
// Dependencies: serde, crate::core::{labels, meta, object, quantity}
// ============================================================================

//! ## Overview
//! A node pool is owned by exactly one cluster and labeled with the cluster
//! name. Sizes are [`Quantity`] values keyed by resource name, so they are
//! stored in canonical form.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::labels::RESOURCE_CPU;
use crate::core::labels::RESOURCE_MEMORY;
use crate::core::labels::RESOURCE_STORAGE;
use crate::core::meta::Condition;
use crate::core::object::Object;
use crate::core::object::ResourceSpec;
use crate::core::quantity::Quantity;

// ============================================================================
// SECTION: Node Pool
// ============================================================================

/// Resource name to quantity map.
pub type ResourceList = BTreeMap<String, Quantity>;

/// Additional storage attached to every node of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageResource {
    /// DNS-label name.
    pub name: String,
    /// Size.
    pub quantity: Quantity,
    /// Storage type; empty when unspecified.
    #[serde(default, rename = "type")]
    pub storage_type: String,
}

/// Node pool spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolSpec {
    /// Desired node count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    /// Nodes run the control plane.
    #[serde(default)]
    pub control_plane: bool,
    /// Nodes run the load balancer.
    #[serde(default)]
    pub load_balancer: bool,
    /// Nodes run only control plane components.
    #[serde(default)]
    pub control_plane_components_only: bool,
    /// Per-node resources.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: ResourceList,
    /// Per-node additional storage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub storage_resources: Vec<StorageResource>,
}

impl NodePoolSpec {
    /// Returns the CPU quantity.
    #[must_use]
    pub fn cpu(&self) -> Option<&Quantity> {
        self.resources.get(RESOURCE_CPU)
    }

    /// Returns the memory quantity.
    #[must_use]
    pub fn memory(&self) -> Option<&Quantity> {
        self.resources.get(RESOURCE_MEMORY)
    }

    /// Returns the storage quantity.
    #[must_use]
    pub fn storage(&self) -> Option<&Quantity> {
        self.resources.get(RESOURCE_STORAGE)
    }
}

/// Node pool status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolStatus {
    /// Reported conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl ResourceSpec for NodePoolSpec {
    const KIND: &'static str = "NodePool";
    const NAMESPACED: bool = true;
    type Status = NodePoolStatus;
}

/// Stored node pool.
pub type NodePool = Object<NodePoolSpec>;
