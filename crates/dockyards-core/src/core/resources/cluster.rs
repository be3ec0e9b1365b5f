// crates/dockyards-core/src/core/resources/cluster.rs
// ============================================================================
// Module: Dockyards Cluster Resources
// Description: Clusters and nodes.
// Purpose: Model workload clusters and the nodes reported for them.
// Dependencies: serde, crate::core::{meta, object}
// ============================================================================

//! ## Overview
//! Clusters are owned by an organization and live in its namespace. Nodes are
//! owned by a node pool and labeled with both the cluster and pool names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::meta::Condition;
use crate::core::object::Object;
use crate::core::object::ResourceSpec;

// ============================================================================
// SECTION: Cluster
// ============================================================================

/// Cluster spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Requested Kubernetes version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Cluster status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    /// Version currently running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Reported conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl ResourceSpec for ClusterSpec {
    const KIND: &'static str = "Cluster";
    const NAMESPACED: bool = true;
    type Status = ClusterStatus;
}

/// Stored cluster.
pub type Cluster = Object<ClusterSpec>;

// ============================================================================
// SECTION: Node
// ============================================================================

/// Node spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    /// Infrastructure provider identifier.
    #[serde(default, rename = "providerID", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

/// Node status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    /// Reported conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl ResourceSpec for NodeSpec {
    const KIND: &'static str = "Node";
    const NAMESPACED: bool = true;
    type Status = NodeStatus;
}

/// Stored node.
pub type Node = Object<NodeSpec>;
