// crates/dockyards-api/src/types.rs
// ============================================================================
// Module: Dockyards API Types
// Description: External JSON options (requests) and views (responses).
// Purpose: Define the wire shapes independent of stored object shapes.
// Dependencies: serde, dockyards-core
// ============================================================================

//! ## Overview
//! Options are what callers submit; every field is optional so that missing
//! and malformed values reach the validator and surface as 422 instead of a
//! decoder error. Node pool and password options also accept the legacy
//! `PascalCase` field names. Views are what handlers return; they never carry
//! password hashes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockyards_core::Role;
use dockyards_core::Timestamp;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Node Pools
// ============================================================================

/// Storage resource entry as submitted and returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageResourceOptions {
    /// Resource name.
    #[serde(default, alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Quantity string.
    #[serde(default, alias = "Quantity", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// Storage type.
    #[serde(default, rename = "type", alias = "Type", skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
}

/// Node pool options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolOptions {
    /// Requested (user-visible) name.
    #[serde(default, alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replica count.
    #[serde(default, alias = "Quantity", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// CPU count.
    #[serde(default, alias = "CPUCount", skip_serializing_if = "Option::is_none")]
    pub cpu_count: Option<i64>,
    /// Memory size quantity.
    #[serde(default, alias = "RAMSize", skip_serializing_if = "Option::is_none")]
    pub ram_size: Option<String>,
    /// Disk size quantity.
    #[serde(default, alias = "DiskSize", skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<String>,
    /// Control plane flag.
    #[serde(default, alias = "ControlPlane", skip_serializing_if = "Option::is_none")]
    pub control_plane: Option<bool>,
    /// Load balancer flag.
    #[serde(default, alias = "LoadBalancer", skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<bool>,
    /// Control plane components only flag.
    #[serde(default, alias = "ControlPlaneComponentsOnly", skip_serializing_if = "Option::is_none")]
    pub control_plane_components_only: Option<bool>,
    /// Storage resources; replaces the stored list when present.
    #[serde(default, alias = "StorageResources", skip_serializing_if = "Option::is_none")]
    pub storage_resources: Option<Vec<StorageResourceOptions>>,
}

/// Node pool view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolView {
    /// Pool uid.
    pub id: String,
    /// Owning cluster uid.
    pub cluster_id: String,
    /// Pool fields in option form; `name` is the requested name.
    #[serde(flatten)]
    pub options: NodePoolOptions,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Deletion request time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
    /// Nodes owned by the pool, on single-pool reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NodeView>>,
}

/// Node view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    /// Node uid.
    pub id: String,
    /// Node name.
    pub name: String,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Last transition of the Ready condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    /// Deletion request time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
    /// Ready condition reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

// ============================================================================
// SECTION: Clusters
// ============================================================================

/// Cluster creation and update options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOptions {
    /// Cluster name; create only.
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    /// Kubernetes version.
    #[serde(default, alias = "Version")]
    pub version: Option<String>,
    /// Cluster template to expand into node pools.
    #[serde(default, alias = "ClusterTemplate")]
    pub cluster_template: Option<String>,
    /// Explicit node pools; takes precedence over templates.
    #[serde(default, alias = "NodePoolOptions")]
    pub node_pool_options: Option<Vec<NodePoolOptions>>,
    /// Skip template node pools.
    #[serde(default, alias = "NoDefaultNodePools")]
    pub no_default_node_pools: Option<bool>,
}

/// Cluster view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterView {
    /// Cluster uid.
    pub id: String,
    /// Cluster name.
    pub name: String,
    /// Desired or reported version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Deletion request time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
    /// Ready condition reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Last transition of the Ready condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    /// Requested names of the cluster's node pools.
    pub node_pools: Vec<String>,
}

// ============================================================================
// SECTION: Organizations
// ============================================================================

/// Organization creation options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationOptions {
    /// Organization name.
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    /// Display name.
    #[serde(default, alias = "DisplayName")]
    pub display_name: Option<String>,
}

/// Organization view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationView {
    /// Organization uid.
    pub id: String,
    /// Organization name.
    pub name: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Deletion request time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
    /// Members in role order.
    pub members: Vec<MemberView>,
}

/// Member view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    /// User uid.
    pub id: String,
    /// User name.
    pub name: String,
    /// Member role.
    pub role: Role,
    /// Organization creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

// ============================================================================
// SECTION: Invitations
// ============================================================================

/// Invitation options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationOptions {
    /// Invitee email.
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
    /// Role granted on acceptance.
    #[serde(default, alias = "Role")]
    pub role: Option<String>,
    /// Validity window, `<int>(h|m|s)`.
    #[serde(default, alias = "Duration")]
    pub duration: Option<String>,
}

/// Invitation view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationView {
    /// Invitation uid.
    pub id: String,
    /// Generated invitation name.
    pub name: String,
    /// Invitee email.
    pub email: String,
    /// Role granted on acceptance.
    pub role: Role,
    /// Validity window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Inviting organization name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Deletion request time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
}

// ============================================================================
// SECTION: Users and Sessions
// ============================================================================

/// Sign-up options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpOptions {
    /// Email address.
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
    /// Plain-text password.
    #[serde(default, alias = "Password")]
    pub password: Option<String>,
    /// Display name.
    #[serde(default, alias = "DisplayName")]
    pub display_name: Option<String>,
}

/// Password change options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordOptions {
    /// Current password.
    #[serde(default, alias = "OldPassword")]
    pub old_password: Option<String>,
    /// Replacement password.
    #[serde(default, alias = "NewPassword")]
    pub new_password: Option<String>,
}

/// Login options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOptions {
    /// Email address.
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
    /// Plain-text password.
    #[serde(default, alias = "Password")]
    pub password: Option<String>,
}

/// User view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    /// User uid.
    pub id: String,
    /// User name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Authentication origin.
    #[serde(rename = "providerID", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Last transition of the Ready condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Cluster template view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTemplateView {
    /// Template uid.
    pub id: String,
    /// Template name.
    pub name: String,
    /// Whether clusters use this template by default.
    pub is_default: bool,
    /// Node pools the template creates.
    pub node_pool_options: Vec<NodePoolOptions>,
}

/// Release view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseView {
    /// Release uid.
    pub id: String,
    /// Release name.
    pub name: String,
    /// Release channel type.
    #[serde(rename = "type")]
    pub release_type: String,
    /// Newest version within the ranges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    /// Versions within the ranges.
    pub versions: Vec<String>,
    /// Whether new clusters default to this release.
    pub is_default: bool,
}
