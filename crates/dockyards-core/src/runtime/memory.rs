// crates/dockyards-core/src/runtime/memory.rs
// ============================================================================
// Module: Dockyards In-Memory Store
// Description: Mutex-protected in-memory object store.
// Purpose: Provide a deterministic store for tests and single-process runs.
// Dependencies: async-trait, crate::core, crate::interfaces, crate::runtime::semantics
// ============================================================================

//! ## Overview
//! [`InMemoryObjectStore`] keeps records in a `BTreeMap` keyed by
//! `(kind, namespace, name)` behind a single mutex, so each call is atomic.
//! State is lost when the process exits.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;

use crate::core::ObjectKey;
use crate::core::RawObject;
use crate::interfaces::DeleteOutcome;
use crate::interfaces::ListParams;
use crate::interfaces::ObjectStore;
use crate::interfaces::StoreError;
use crate::runtime::semantics::RecordTable;
use crate::runtime::semantics::create_object;
use crate::runtime::semantics::delete_object;
use crate::runtime::semantics::list_objects;
use crate::runtime::semantics::update_object;

// ============================================================================
// SECTION: Record Table
// ============================================================================

/// Map key: kind, namespace (empty for cluster-scoped), name.
type RecordKey = (String, String, String);

/// Builds the map key for an object key.
fn record_key(key: &ObjectKey) -> RecordKey {
    (key.kind.clone(), key.namespace.clone().unwrap_or_default(), key.name.clone())
}

/// In-memory record table.
#[derive(Debug, Default)]
struct MemoryTable {
    /// Records by key.
    records: BTreeMap<RecordKey, RawObject>,
    /// Last issued revision.
    revision: u64,
}

impl RecordTable for MemoryTable {
    fn load(&self, key: &ObjectKey) -> Result<Option<RawObject>, StoreError> {
        Ok(self.records.get(&record_key(key)).cloned())
    }

    fn scan(&self, kind: &str, namespace: Option<&str>) -> Result<Vec<RawObject>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|((record_kind, record_namespace, _), _)| {
                record_kind == kind && namespace.is_none_or(|ns| ns == record_namespace.as_str())
            })
            .map(|(_, object)| object.clone())
            .collect())
    }

    fn dependents(&self, uid: &str) -> Result<Vec<RawObject>, StoreError> {
        Ok(self.records.values().filter(|object| object.metadata.is_owned_by(uid)).cloned().collect())
    }

    fn put(&mut self, object: &RawObject) -> Result<(), StoreError> {
        self.records.insert(record_key(&object.key()), object.clone());
        Ok(())
    }

    fn remove(&mut self, key: &ObjectKey) -> Result<(), StoreError> {
        self.records.remove(&record_key(key));
        Ok(())
    }

    fn next_revision(&mut self) -> Result<u64, StoreError> {
        self.revision = self
            .revision
            .checked_add(1)
            .ok_or_else(|| StoreError::Store("revision counter exhausted".to_string()))?;
        Ok(self.revision)
    }
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory object store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryObjectStore {
    /// Record table protected by a mutex.
    table: Arc<Mutex<MemoryTable>>,
}

impl InMemoryObjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the table.
    fn lock(&self) -> Result<MutexGuard<'_, MemoryTable>, StoreError> {
        self.table.lock().map_err(|_| StoreError::Store("object store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, key: &ObjectKey) -> Result<Option<RawObject>, StoreError> {
        self.lock()?.load(key)
    }

    async fn list(&self, kind: &str, params: &ListParams) -> Result<Vec<RawObject>, StoreError> {
        list_objects(&*self.lock()?, kind, params)
    }

    async fn create(&self, object: RawObject) -> Result<RawObject, StoreError> {
        create_object(&mut *self.lock()?, object)
    }

    async fn update(&self, object: RawObject) -> Result<RawObject, StoreError> {
        update_object(&mut *self.lock()?, object, false)
    }

    async fn update_status(&self, object: RawObject) -> Result<RawObject, StoreError> {
        update_object(&mut *self.lock()?, object, true)
    }

    async fn delete(&self, key: &ObjectKey) -> Result<DeleteOutcome, StoreError> {
        delete_object(&mut *self.lock()?, key)
    }
}
