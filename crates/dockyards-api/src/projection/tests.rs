// crates/dockyards-api/src/projection/tests.rs
// ============================================================================
// Module: Projector Unit Tests
// Description: Conversions between stored objects and external views.
// Purpose: Keep unit and naming conversions lossless.
// Dependencies: dockyards-api, dockyards-core
// ============================================================================

//! ## Overview
//! Covers node pool unit conversions, name prefixes, member ordering, and
//! Ready condition projection.

#![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockyards_core::CONDITION_READY;
use dockyards_core::Cluster;
use dockyards_core::ClusterSpec;
use dockyards_core::Condition;
use dockyards_core::LABEL_DEFAULT_RELEASE;
use dockyards_core::MemberReference;
use dockyards_core::Node;
use dockyards_core::NodePool;
use dockyards_core::NodePoolSpec;
use dockyards_core::NodeSpec;
use dockyards_core::ObjectMeta;
use dockyards_core::Organization;
use dockyards_core::OrganizationSpec;
use dockyards_core::Release;
use dockyards_core::ReleaseSpec;
use dockyards_core::Role;
use dockyards_core::Timestamp;

use super::apply_node_pool_changes;
use super::cluster_view;
use super::member_views;
use super::node_pool_options;
use super::node_pool_view;
use super::node_view;
use super::release_view;
use super::requested_node_pool_name;
use super::sort_nodes;
use super::stored_node_pool_name;
use super::user_name_prefix;
use crate::types::NodePoolOptions;
use crate::types::StorageResourceOptions;
use crate::validation::NodePoolIntent;
use crate::validation::validate_node_pool;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a stored object identity for projection tests.
fn meta(namespace: &str, name: &str, created: i64) -> ObjectMeta {
    let mut metadata = ObjectMeta::namespaced(namespace, name);
    metadata.uid = format!("uid-{name}");
    metadata.creation_timestamp = Timestamp::from_unix_seconds(created);
    metadata
}

/// Ready condition with a fixed transition time.
fn ready(reason: &str, at: i64) -> Condition {
    Condition {
        condition_type: CONDITION_READY.to_string(),
        status: "True".to_string(),
        reason: reason.to_string(),
        message: String::new(),
        last_transition_time: Timestamp::from_unix_seconds(at).unwrap(),
    }
}

// ============================================================================
// SECTION: Node Pools
// ============================================================================

#[test]
fn node_pool_options_survive_storage() {
    let options = NodePoolOptions {
        name: Some("workers".to_string()),
        quantity: Some(3),
        cpu_count: Some(2),
        ram_size: Some("3M".to_string()),
        disk_size: Some("4Gi".to_string()),
        storage_resources: Some(vec![StorageResourceOptions {
            name: Some("data".to_string()),
            quantity: Some("10Gi".to_string()),
            storage_type: Some("HostPath".to_string()),
        }]),
        ..NodePoolOptions::default()
    };
    let changes = validate_node_pool(&options, NodePoolIntent::Create, 16).unwrap();
    let mut spec = NodePoolSpec::default();
    apply_node_pool_changes(&mut spec, &changes);

    let projected = node_pool_options("workers", &spec);
    assert_eq!(projected.quantity, Some(3));
    assert_eq!(projected.cpu_count, Some(2));
    assert_eq!(projected.ram_size.as_deref(), Some("3M"));
    assert_eq!(projected.disk_size.as_deref(), Some("4Gi"));
    assert_eq!(projected.storage_resources, options.storage_resources);
}

#[test]
fn fractional_cpu_rounds_up() {
    let mut spec = NodePoolSpec::default();
    spec.resources.insert(dockyards_core::RESOURCE_CPU.to_string(), "1500m".parse().unwrap());
    assert_eq!(node_pool_options("pool", &spec).cpu_count, Some(2));
}

#[test]
fn partial_changes_leave_other_fields_alone() {
    let mut spec = NodePoolSpec {
        replicas: Some(2),
        control_plane: true,
        ..NodePoolSpec::default()
    };
    spec.resources.insert(dockyards_core::RESOURCE_MEMORY.to_string(), "2Gi".parse().unwrap());
    let options = NodePoolOptions {
        disk_size: Some("20Gi".to_string()),
        ..NodePoolOptions::default()
    };
    let changes = validate_node_pool(&options, NodePoolIntent::Update, 16).unwrap();
    apply_node_pool_changes(&mut spec, &changes);
    assert_eq!(spec.replicas, Some(2));
    assert!(spec.control_plane);
    assert_eq!(spec.memory().unwrap().to_canonical_string(), "2Gi");
    assert_eq!(spec.storage().unwrap().to_canonical_string(), "20Gi");
}

#[test]
fn node_pool_names_strip_cluster_prefix() {
    assert_eq!(stored_node_pool_name("alpha", "workers"), "alpha-workers");
    assert_eq!(requested_node_pool_name("alpha", "alpha-workers"), "workers");
    assert_eq!(requested_node_pool_name("alpha", "beta-workers"), "beta-workers");
    assert_eq!(requested_node_pool_name("alpha", "alphaworkers"), "alphaworkers");
}

#[test]
fn user_names_derive_from_email_local_part() {
    assert_eq!(user_name_prefix("test@dockyards.dev"), "test-");
    assert_eq!(user_name_prefix("First.Last+tag@example.com"), "first-last-tag-");
    assert_eq!(user_name_prefix("42@example.com"), "user-42-");
    assert_eq!(user_name_prefix("...@example.com"), "user-");
    let long = format!("{}@example.com", "a".repeat(100));
    let prefix = user_name_prefix(&long);
    assert!(prefix.len() + dockyards_core::GENERATED_SUFFIX_LENGTH <= dockyards_core::MAX_DNS_LABEL_LENGTH);
    assert!(dockyards_core::is_dns_label(&format!("{prefix}abcde")));
}

#[test]
fn node_pool_view_reports_cluster_identity() {
    let cluster = Cluster::new(meta("org-ns", "alpha", 10), ClusterSpec::default());
    let pool = NodePool::new(meta("org-ns", "alpha-workers", 11), NodePoolSpec::default());
    let view = node_pool_view(&cluster, &pool, None);
    assert_eq!(view.cluster_id, "uid-alpha");
    assert_eq!(view.options.name.as_deref(), Some("workers"));
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["name"], "workers");
    assert!(json.get("nodes").is_none());
}

// ============================================================================
// SECTION: Conditions
// ============================================================================

#[test]
fn ready_condition_drives_updated_at_and_condition() {
    let mut node = Node::new(meta("org-ns", "node-a", 10), NodeSpec::default());
    assert!(node_view(&node).condition.is_none());
    node.status.conditions.push(ready("NodeReady", 50));
    let view = node_view(&node);
    assert_eq!(view.condition.as_deref(), Some("NodeReady"));
    assert_eq!(view.updated_at, Timestamp::from_unix_seconds(50));
}

#[test]
fn cluster_prefers_reported_version() {
    let mut cluster = Cluster::new(
        meta("org-ns", "alpha", 10),
        ClusterSpec {
            version: Some("v1.29.0".to_string()),
        },
    );
    assert_eq!(cluster_view(&cluster, &[]).version.as_deref(), Some("v1.29.0"));
    cluster.status.version = Some("v1.29.1".to_string());
    let pools = [NodePool::new(meta("org-ns", "alpha-cp", 11), NodePoolSpec::default())];
    let view = cluster_view(&cluster, &pools);
    assert_eq!(view.version.as_deref(), Some("v1.29.1"));
    assert_eq!(view.node_pools, vec!["cp".to_string()]);
}

#[test]
fn nodes_sort_by_creation_then_name() {
    let mut nodes = vec![
        Node::new(meta("ns", "c", 20), NodeSpec::default()),
        Node::new(meta("ns", "b", 10), NodeSpec::default()),
        Node::new(meta("ns", "a", 20), NodeSpec::default()),
    ];
    sort_nodes(&mut nodes);
    let names: Vec<&str> = nodes.iter().map(Node::name).collect();
    assert_eq!(names, ["b", "a", "c"]);
}

// ============================================================================
// SECTION: Organizations
// ============================================================================

#[test]
fn members_sort_by_role_then_name() {
    let member = |name: &str, role: Role| MemberReference {
        name: name.to_string(),
        uid: format!("uid-{name}"),
        role,
    };
    let mut metadata = ObjectMeta::named("acme");
    metadata.creation_timestamp = Timestamp::from_unix_seconds(5);
    let organization = Organization::new(
        metadata,
        OrganizationSpec {
            member_refs: vec![
                member("zed", Role::Reader),
                member("bob", Role::User),
                member("amy", Role::Reader),
                member("root", Role::SuperUser),
            ],
            ..OrganizationSpec::default()
        },
    );
    let members = member_views(&organization);
    let order: Vec<&str> = members.iter().map(|member| member.name.as_str()).collect();
    assert_eq!(order, ["root", "bob", "amy", "zed"]);
    assert!(members.iter().all(|member| member.created_at == Timestamp::from_unix_seconds(5)));
}

#[test]
fn release_default_marker_is_exact() {
    let metadata = meta("dockyards-system", "stable", 1).with_label(LABEL_DEFAULT_RELEASE, "true");
    let release = Release::new(metadata, ReleaseSpec::default());
    assert!(release_view(&release).is_default);
    let metadata = meta("dockyards-system", "beta", 1).with_label(LABEL_DEFAULT_RELEASE, "yes");
    assert!(!release_view(&Release::new(metadata, ReleaseSpec::default())).is_default);
}
