// crates/dockyards-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Object Store Tests
// Description: Durability and lifecycle tests for the SQLite store.
// Purpose: Ensure the SQLite backend matches in-memory store semantics.
// Dependencies: dockyards-core, dockyards-store-sqlite, tempfile, tokio
// ============================================================================
//! ## Overview
//! Exercises create/update/delete through the typed client against a
//! temporary database and reopens it to confirm persistence.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::sync::Arc;

use dockyards_core::Client;
use dockyards_core::DeleteOutcome;
use dockyards_core::IndexKey;
use dockyards_core::ListParams;
use dockyards_core::Namespace;
use dockyards_core::NamespaceSpec;
use dockyards_core::NodePool;
use dockyards_core::NodePoolSpec;
use dockyards_core::ObjectMeta;
use dockyards_core::Organization;
use dockyards_core::OrganizationSpec;
use dockyards_core::Quantity;
use dockyards_core::StoreError;
use dockyards_core::User;
use dockyards_core::UserSpec;
use dockyards_core::labels::FINALIZER_DOCKYARDS;
use dockyards_core::labels::RESOURCE_MEMORY;
use dockyards_store_sqlite::SqliteObjectStore;
use dockyards_store_sqlite::SqliteStoreConfig;
use tempfile::TempDir;

fn open(dir: &TempDir) -> Client {
    let config = SqliteStoreConfig::at(dir.path().join("store.db"));
    Client::new(Arc::new(SqliteObjectStore::new(&config).expect("open store")))
}

#[tokio::test]
async fn objects_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let created = {
        let client = open(&dir);
        client.create(&Namespace::new(ObjectMeta::named("org-a"), NamespaceSpec {})).await.unwrap();
        let mut spec = NodePoolSpec::default();
        spec.resources.insert(RESOURCE_MEMORY.to_string(), Quantity::parse("4Gi").unwrap());
        client.create(&NodePool::new(ObjectMeta::namespaced("org-a", "c-pool"), spec)).await.unwrap()
    };
    let client = open(&dir);
    let loaded = client.get::<NodePoolSpec>(Some("org-a"), "c-pool").await.unwrap().unwrap();
    assert_eq!(loaded.metadata.uid, created.metadata.uid);
    assert_eq!(loaded.spec.memory().unwrap().to_canonical_string(), "4Gi");

    let next = client.create(&Namespace::new(ObjectMeta::named("org-b"), NamespaceSpec {})).await.unwrap();
    let before: u64 = created.metadata.resource_version.parse().unwrap();
    let after: u64 = next.metadata.resource_version.parse().unwrap();
    assert!(after > before);
}

#[tokio::test]
async fn conflicts_and_duplicates_are_rejected() {
    let dir = TempDir::new().unwrap();
    let client = open(&dir);
    let org = client
        .create(&Organization::new(ObjectMeta::named("acme"), OrganizationSpec::default()))
        .await
        .unwrap();
    let err = client
        .create(&Organization::new(ObjectMeta::named("acme"), OrganizationSpec::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));

    let mut first = org.clone();
    first.spec.display_name = Some("Acme".to_string());
    client.update(&first).await.unwrap();
    let mut stale = org;
    stale.spec.display_name = Some("Stale".to_string());
    assert!(matches!(client.update(&stale).await.unwrap_err(), StoreError::Conflict(_)));
}

#[tokio::test]
async fn user_emails_stay_unique_after_reopen() {
    let dir = TempDir::new().unwrap();
    let spec = UserSpec {
        email: "root@dockyards.dev".to_string(),
        ..UserSpec::default()
    };
    open(&dir).create(&User::new(ObjectMeta::named("root"), spec.clone())).await.unwrap();
    let client = open(&dir);
    let err = client.create(&User::new(ObjectMeta::named("root-2"), spec)).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
}

#[tokio::test]
async fn finalized_delete_then_cascade() {
    let dir = TempDir::new().unwrap();
    let client = open(&dir);
    let org_meta = ObjectMeta::named("acme").with_finalizer(FINALIZER_DOCKYARDS);
    let org = client.create(&Organization::new(org_meta, OrganizationSpec::default())).await.unwrap();
    let ns_meta = ObjectMeta::named("org-acme").with_owner(org.owner_reference());
    client.create(&Namespace::new(ns_meta, NamespaceSpec {})).await.unwrap();

    let outcome = client.delete::<OrganizationSpec>(None, "acme").await.unwrap();
    assert!(matches!(outcome, DeleteOutcome::Deleting(_)));
    let owned = client
        .list::<NamespaceSpec>(&ListParams::default().with_index(IndexKey::OwnerUid(org.uid().to_string())))
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);

    client
        .patch::<OrganizationSpec, _>(None, "acme", |org| org.metadata.finalizers.clear())
        .await
        .unwrap();
    assert!(client.get::<OrganizationSpec>(None, "acme").await.unwrap().is_none());
    assert!(client.get::<NamespaceSpec>(None, "org-acme").await.unwrap().is_none());
}

#[test]
fn directory_paths_are_rejected() {
    let dir = TempDir::new().unwrap();
    let config = SqliteStoreConfig::at(dir.path());
    assert!(SqliteObjectStore::new(&config).is_err());
}
