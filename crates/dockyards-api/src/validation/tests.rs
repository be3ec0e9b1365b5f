// crates/dockyards-api/src/validation/tests.rs
// ============================================================================
// Module: Validator Unit Tests
// Description: Rule-by-rule checks for request option validation.
// Purpose: Keep 422 boundaries stable.
// Dependencies: dockyards-api, dockyards-core, proptest
// ============================================================================

//! ## Overview
//! Exercises names, roles, durations, quantities, replicas, storage
//! resources, and the node pool rename rule.

#![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use axum::body::Bytes;
use dockyards_core::Role;
use proptest::prelude::*;

use super::NodePoolIntent;
use super::parse_body;
use super::parse_duration;
use super::parse_role;
use super::size_quantity;
use super::validate_email;
use super::validate_name;
use super::validate_node_pool;
use super::validate_password;
use super::validate_replicas;
use super::validate_storage_resources;
use super::verify_password;
use crate::error::ApiError;
use crate::types::NodePoolOptions;
use crate::types::StorageResourceOptions;

// ============================================================================
// SECTION: Scalars
// ============================================================================

#[test]
fn names_follow_dns_label_rules() {
    assert!(validate_name("name", "test-super-user").is_ok());
    for bad in ["", "InvalidName", "1abc", "abc-", "has space", "<tag>", &"a".repeat(64)] {
        assert!(matches!(validate_name("name", bad), Err(ApiError::Validation(_))), "{bad}");
    }
}

#[test]
fn roles_are_exact() {
    assert_eq!(parse_role("SuperUser").unwrap(), Role::SuperUser);
    assert_eq!(parse_role("Reader").unwrap(), Role::Reader);
    assert!(parse_role("admin").is_err());
    assert!(parse_role("superuser").is_err());
}

#[test]
fn durations_follow_suffix_grammar() {
    assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
    assert_eq!(parse_duration("15m").unwrap(), Duration::from_secs(900));
    assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
    for bad in ["", "h", "10", "10d", "-5m", "1.5h", "5é", "99999999999999999999h"] {
        assert!(parse_duration(bad).is_err(), "{bad}");
    }
}

#[test]
fn emails_need_local_and_domain_parts() {
    assert!(validate_email("test@dockyards.dev").is_ok());
    for bad in ["", "test", "@dockyards.dev", "test@", "a b@c.d", "a@b@c"] {
        assert!(validate_email(bad).is_err(), "{bad}");
    }
}

#[test]
fn passwords_are_bounded() {
    assert!(validate_password("password", "testing").is_ok());
    assert!(validate_password("password", "").is_err());
    assert!(validate_password("password", &"x".repeat(73)).is_err());
}

#[test]
fn empty_bodies_decode_as_empty_objects() {
    let options: NodePoolOptions = parse_body(&Bytes::new()).unwrap();
    assert!(options.name.is_none());
    let err = parse_body::<NodePoolOptions>(&Bytes::from_static(b"{\"quantity\": \"x\"}")).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

// ============================================================================
// SECTION: Node Pools
// ============================================================================

#[test]
fn replicas_are_capped() {
    assert_eq!(validate_replicas(0, 16).unwrap(), 0);
    assert_eq!(validate_replicas(16, 16).unwrap(), 16);
    assert!(validate_replicas(17, 16).is_err());
    assert!(validate_replicas(-1, 16).is_err());
}

#[test]
fn sizes_parse_and_reject_negatives() {
    assert_eq!(size_quantity("ramSize", "4Gi").unwrap().to_canonical_string(), "4Gi");
    assert_eq!(size_quantity("diskSize", "3M").unwrap().to_canonical_string(), "3M");
    assert!(size_quantity("ramSize", "four").is_err());
    assert!(size_quantity("ramSize", "-1Gi").is_err());
}

#[test]
fn rename_is_rejected_on_update() {
    let options = NodePoolOptions {
        name: Some("hello".to_string()),
        ..NodePoolOptions::default()
    };
    assert!(matches!(
        validate_node_pool(&options, NodePoolIntent::Update, 16),
        Err(ApiError::Validation(_))
    ));
    let changes = validate_node_pool(&options, NodePoolIntent::Create, 16).unwrap();
    assert_eq!(changes.name.as_deref(), Some("hello"));
}

#[test]
fn create_requires_a_name() {
    assert!(validate_node_pool(&NodePoolOptions::default(), NodePoolIntent::Create, 16).is_err());
}

#[test]
fn cpu_counts_become_decimal_quantities() {
    let options = NodePoolOptions {
        cpu_count: Some(3),
        ..NodePoolOptions::default()
    };
    let changes = validate_node_pool(&options, NodePoolIntent::Update, 16).unwrap();
    assert_eq!(changes.cpu.unwrap().to_canonical_string(), "3");
    let negative = NodePoolOptions {
        cpu_count: Some(-1),
        ..NodePoolOptions::default()
    };
    assert!(validate_node_pool(&negative, NodePoolIntent::Update, 16).is_err());
}

#[test]
fn storage_resources_check_name_quantity_and_type() {
    let entry = |name: &str, quantity: &str, storage_type: Option<&str>| StorageResourceOptions {
        name: Some(name.to_string()),
        quantity: Some(quantity.to_string()),
        storage_type: storage_type.map(str::to_string),
    };
    let valid = validate_storage_resources(&[entry("data", "10Gi", Some("HostPath")), entry("scratch", "1Gi", None)])
        .unwrap();
    assert_eq!(valid.len(), 2);
    assert_eq!(valid[1].storage_type, "");
    assert!(validate_storage_resources(&[entry("Data", "10Gi", None)]).is_err());
    assert!(validate_storage_resources(&[entry("data", "ten", None)]).is_err());
    assert!(validate_storage_resources(&[entry("data", "10Gi", Some("Nfs"))]).is_err());
    assert!(validate_storage_resources(&[entry("data", "1Gi", None), entry("data", "2Gi", None)]).is_err());
}

// ============================================================================
// SECTION: Passwords
// ============================================================================

#[tokio::test]
async fn password_verification_is_exact() {
    let hash = bcrypt::hash("testing", 4).unwrap();
    assert!(verify_password("testing".to_string(), hash.clone()).await.unwrap());
    assert!(!verify_password("Testing".to_string(), hash).await.unwrap());
    assert!(!verify_password("testing".to_string(), "not-a-hash".to_string()).await.unwrap());
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn duration_parser_never_panics(input in ".{0,24}") {
        let _ = parse_duration(&input);
    }

    #[test]
    fn valid_durations_scale_by_unit(amount in 0u64 .. 1_000_000, unit in prop::sample::select(vec!["h", "m", "s"])) {
        let parsed = parse_duration(&format!("{amount}{unit}")).unwrap();
        let factor = match unit {
            "h" => 3600,
            "m" => 60,
            _ => 1,
        };
        prop_assert_eq!(parsed.as_secs(), amount * factor);
    }
}
