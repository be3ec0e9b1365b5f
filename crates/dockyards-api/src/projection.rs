// crates/dockyards-api/src/projection.rs
// ============================================================================
// Module: Dockyards Projector
// Description: Mapping between external options/views and stored objects.
// Purpose: Keep unit conversions and naming rules in one place.
// Dependencies: dockyards-core
// ============================================================================

//! ## Overview
//! Views are built from stored objects; node pool options are applied onto
//! stored specs. Conversions:
//! - `cpuCount` is `resources.cpu` rounded up to whole cores
//! - `ramSize` and `diskSize` are the canonical strings of `resources.memory`
//!   and `resources.storage`
//! - `quantity` is `replicas`
//! - a node pool is stored as `<cluster>-<requested>` and shown as
//!   `<requested>`
//! - `updatedAt` and `condition` come from the Ready condition

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockyards_core::CONDITION_READY;
use dockyards_core::Cluster;
use dockyards_core::ClusterTemplate;
use dockyards_core::Condition;
use dockyards_core::GENERATED_SUFFIX_LENGTH;
use dockyards_core::Invitation;
use dockyards_core::LABEL_DEFAULT_CLUSTER_TEMPLATE;
use dockyards_core::LABEL_DEFAULT_RELEASE;
use dockyards_core::LABEL_ORGANIZATION_NAME;
use dockyards_core::MAX_DNS_LABEL_LENGTH;
use dockyards_core::Node;
use dockyards_core::NodePool;
use dockyards_core::NodePoolSpec;
use dockyards_core::ObjectMeta;
use dockyards_core::Organization;
use dockyards_core::RESOURCE_CPU;
use dockyards_core::RESOURCE_MEMORY;
use dockyards_core::RESOURCE_STORAGE;
use dockyards_core::Release;
use dockyards_core::User;
use dockyards_core::find_condition;

use crate::types::ClusterTemplateView;
use crate::types::ClusterView;
use crate::types::InvitationView;
use crate::types::MemberView;
use crate::types::NodePoolOptions;
use crate::types::NodePoolView;
use crate::types::NodeView;
use crate::types::OrganizationView;
use crate::types::ReleaseView;
use crate::types::StorageResourceOptions;
use crate::types::UserView;
use crate::validation::NodePoolChanges;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Leading segment for user names whose email starts with a non-letter.
const USER_NAME_FALLBACK: &str = "user-";

/// Label value marking a default catalog entry.
pub const DEFAULT_MARKER: &str = "true";

// ============================================================================
// SECTION: Naming
// ============================================================================

/// Stored node pool name for a requested name.
#[must_use]
pub fn stored_node_pool_name(cluster: &str, requested: &str) -> String {
    format!("{cluster}-{requested}")
}

/// Name prefix for a signed-up user, derived from the email local part.
///
/// The result ends in `-` and leaves room for the store's random suffix.
#[must_use]
pub fn user_name_prefix(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut base = String::with_capacity(local.len());
    for ch in local.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            base.push(ch);
        } else if !base.ends_with('-') {
            base.push('-');
        }
    }
    let mut base = base.trim_matches('-').to_string();
    if !base.starts_with(|ch: char| ch.is_ascii_lowercase()) {
        base.insert_str(0, USER_NAME_FALLBACK);
    }
    base.truncate(MAX_DNS_LABEL_LENGTH - GENERATED_SUFFIX_LENGTH - 1);
    let mut prefix = base.trim_end_matches('-').to_string();
    prefix.push('-');
    prefix
}

/// Requested node pool name for a stored name.
#[must_use]
pub fn requested_node_pool_name<'a>(cluster: &str, stored: &'a str) -> &'a str {
    stored.strip_prefix(cluster).and_then(|rest| rest.strip_prefix('-')).unwrap_or(stored)
}

// ============================================================================
// SECTION: Node Pools
// ============================================================================

/// Applies validated changes onto a stored spec.
///
/// Storage resources are replaced wholesale when present.
pub fn apply_node_pool_changes(spec: &mut NodePoolSpec, changes: &NodePoolChanges) {
    if let Some(replicas) = changes.replicas {
        spec.replicas = Some(replicas);
    }
    if let Some(cpu) = &changes.cpu {
        spec.resources.insert(RESOURCE_CPU.to_string(), cpu.clone());
    }
    if let Some(memory) = &changes.memory {
        spec.resources.insert(RESOURCE_MEMORY.to_string(), memory.clone());
    }
    if let Some(storage) = &changes.storage {
        spec.resources.insert(RESOURCE_STORAGE.to_string(), storage.clone());
    }
    if let Some(control_plane) = changes.control_plane {
        spec.control_plane = control_plane;
    }
    if let Some(load_balancer) = changes.load_balancer {
        spec.load_balancer = load_balancer;
    }
    if let Some(components_only) = changes.control_plane_components_only {
        spec.control_plane_components_only = components_only;
    }
    if let Some(storage_resources) = &changes.storage_resources {
        spec.storage_resources.clone_from(storage_resources);
    }
}

/// Projects a stored spec into option form.
#[must_use]
pub fn node_pool_options(name: &str, spec: &NodePoolSpec) -> NodePoolOptions {
    let storage_resources = spec
        .storage_resources
        .iter()
        .map(|resource| StorageResourceOptions {
            name: Some(resource.name.clone()),
            quantity: Some(resource.quantity.to_canonical_string()),
            storage_type: (!resource.storage_type.is_empty()).then(|| resource.storage_type.clone()),
        })
        .collect::<Vec<_>>();
    NodePoolOptions {
        name: Some(name.to_string()),
        quantity: spec.replicas.map(i64::from),
        cpu_count: spec.cpu().map(dockyards_core::Quantity::whole_units_ceil),
        ram_size: spec.memory().map(dockyards_core::Quantity::to_canonical_string),
        disk_size: spec.storage().map(dockyards_core::Quantity::to_canonical_string),
        control_plane: Some(spec.control_plane),
        load_balancer: Some(spec.load_balancer),
        control_plane_components_only: Some(spec.control_plane_components_only),
        storage_resources: (!storage_resources.is_empty()).then_some(storage_resources),
    }
}

/// Projects a stored node pool.
#[must_use]
pub fn node_pool_view(cluster: &Cluster, pool: &NodePool, nodes: Option<Vec<NodeView>>) -> NodePoolView {
    let requested = requested_node_pool_name(cluster.name(), pool.name());
    NodePoolView {
        id: pool.uid().to_string(),
        cluster_id: cluster.uid().to_string(),
        options: node_pool_options(requested, &pool.spec),
        created_at: pool.metadata.creation_timestamp,
        deleted_at: pool.metadata.deletion_timestamp,
        nodes,
    }
}

/// Projects a stored node.
#[must_use]
pub fn node_view(node: &Node) -> NodeView {
    let ready = ready_condition(&node.status.conditions);
    NodeView {
        id: node.uid().to_string(),
        name: node.name().to_string(),
        created_at: node.metadata.creation_timestamp,
        updated_at: ready.map(|condition| condition.last_transition_time),
        deleted_at: node.metadata.deletion_timestamp,
        condition: ready.map(|condition| condition.reason.clone()),
    }
}

/// Sorts nodes by creation time, then name.
pub fn sort_nodes(nodes: &mut [Node]) {
    nodes.sort_by(|left, right| {
        left.metadata
            .creation_timestamp
            .cmp(&right.metadata.creation_timestamp)
            .then_with(|| left.name().cmp(right.name()))
    });
}

// ============================================================================
// SECTION: Clusters
// ============================================================================

/// Projects a stored cluster with its node pool names.
#[must_use]
pub fn cluster_view(cluster: &Cluster, pools: &[NodePool]) -> ClusterView {
    let ready = ready_condition(&cluster.status.conditions);
    ClusterView {
        id: cluster.uid().to_string(),
        name: cluster.name().to_string(),
        version: cluster.status.version.clone().or_else(|| cluster.spec.version.clone()),
        created_at: cluster.metadata.creation_timestamp,
        deleted_at: cluster.metadata.deletion_timestamp,
        condition: ready.map(|condition| condition.reason.clone()),
        updated_at: ready.map(|condition| condition.last_transition_time),
        node_pools: pools
            .iter()
            .map(|pool| requested_node_pool_name(cluster.name(), pool.name()).to_string())
            .collect(),
    }
}

// ============================================================================
// SECTION: Organizations
// ============================================================================

/// Projects an organization with its members.
#[must_use]
pub fn organization_view(organization: &Organization) -> OrganizationView {
    OrganizationView {
        id: organization.uid().to_string(),
        name: organization.name().to_string(),
        display_name: organization.spec.display_name.clone(),
        created_at: organization.metadata.creation_timestamp,
        deleted_at: organization.metadata.deletion_timestamp,
        members: member_views(organization),
    }
}

/// Projects members in role order (`SuperUser`, `User`, `Reader`), then by
/// name.
///
/// Membership has no timestamp of its own; `createdAt` is the
/// organization's.
#[must_use]
pub fn member_views(organization: &Organization) -> Vec<MemberView> {
    let mut members: Vec<MemberView> = organization
        .spec
        .member_refs
        .iter()
        .map(|member| MemberView {
            id: member.uid.clone(),
            name: member.name.clone(),
            role: member.role,
            created_at: organization.metadata.creation_timestamp,
        })
        .collect();
    members.sort_by(|left, right| left.role.rank().cmp(&right.role.rank()).then_with(|| left.name.cmp(&right.name)));
    members
}

/// Projects an invitation.
#[must_use]
pub fn invitation_view(invitation: &Invitation) -> InvitationView {
    InvitationView {
        id: invitation.uid().to_string(),
        name: invitation.name().to_string(),
        email: invitation.spec.email.clone(),
        role: invitation.spec.role,
        duration: invitation.spec.duration.clone(),
        organization: invitation.metadata.label(LABEL_ORGANIZATION_NAME).map(str::to_string),
        created_at: invitation.metadata.creation_timestamp,
        deleted_at: invitation.metadata.deletion_timestamp,
    }
}

// ============================================================================
// SECTION: Users
// ============================================================================

/// Projects a user; password material is never included.
#[must_use]
pub fn user_view(user: &User) -> UserView {
    UserView {
        id: user.uid().to_string(),
        name: user.name().to_string(),
        email: user.spec.email.clone(),
        display_name: user.spec.display_name.clone(),
        provider_id: user.spec.provider_id.clone(),
        created_at: user.metadata.creation_timestamp,
        updated_at: ready_condition(&user.status.conditions).map(|condition| condition.last_transition_time),
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Returns true when catalog metadata carries the default marker `label`.
#[must_use]
pub fn is_default(metadata: &ObjectMeta, label: &str) -> bool {
    metadata.label(label) == Some(DEFAULT_MARKER)
}

/// Projects a cluster template.
#[must_use]
pub fn cluster_template_view(template: &ClusterTemplate) -> ClusterTemplateView {
    ClusterTemplateView {
        id: template.uid().to_string(),
        name: template.name().to_string(),
        is_default: is_default(&template.metadata, LABEL_DEFAULT_CLUSTER_TEMPLATE),
        node_pool_options: template
            .spec
            .node_pool_templates
            .iter()
            .map(|pool| node_pool_options(&pool.name, &pool.spec))
            .collect(),
    }
}

/// Projects a release.
#[must_use]
pub fn release_view(release: &Release) -> ReleaseView {
    ReleaseView {
        id: release.uid().to_string(),
        name: release.name().to_string(),
        release_type: release.spec.release_type.clone(),
        latest_version: release.status.latest_version.clone(),
        versions: release.status.versions.clone(),
        is_default: is_default(&release.metadata, LABEL_DEFAULT_RELEASE),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the Ready condition.
fn ready_condition(conditions: &[Condition]) -> Option<&Condition> {
    find_condition(conditions, CONDITION_READY)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
