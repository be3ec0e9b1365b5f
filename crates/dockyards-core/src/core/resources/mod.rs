// crates/dockyards-core/src/core/resources/mod.rs
// ============================================================================
// Module: Dockyards Resource Kinds
// Description: Spec and status types for every stored kind.
// Purpose: Group the declarative resource model by domain.
// Dependencies: crate::core::{meta, object, quantity, role}
// ============================================================================

//! ## Overview
//! One submodule per domain. Each spec implements
//! [`crate::core::object::ResourceSpec`] and exports a type alias for its
//! typed object.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod catalog;
pub mod cluster;
pub mod identity;
pub mod node_pool;
pub mod system;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::ClusterTemplate;
pub use catalog::ClusterTemplateSpec;
pub use catalog::NodePoolTemplate;
pub use catalog::Release;
pub use catalog::ReleaseSpec;
pub use catalog::ReleaseStatus;
pub use cluster::Cluster;
pub use cluster::ClusterSpec;
pub use cluster::ClusterStatus;
pub use cluster::Node;
pub use cluster::NodeSpec;
pub use cluster::NodeStatus;
pub use identity::Invitation;
pub use identity::InvitationSpec;
pub use identity::MemberReference;
pub use identity::Organization;
pub use identity::OrganizationSpec;
pub use identity::OrganizationStatus;
pub use identity::User;
pub use identity::UserSpec;
pub use identity::UserStatus;
pub use node_pool::NodePool;
pub use node_pool::NodePoolSpec;
pub use node_pool::NodePoolStatus;
pub use node_pool::ResourceList;
pub use node_pool::StorageResource;
pub use system::Feature;
pub use system::FeatureSpec;
pub use system::Namespace;
pub use system::NamespaceSpec;
pub use system::Secret;
pub use system::SecretSpec;
