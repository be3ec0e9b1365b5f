// crates/dockyards-core/src/runtime/client.rs
// ============================================================================
// Module: Dockyards Typed Client
// Description: Typed CRUD facade over an object store.
// Purpose: Let callers work with `Object<S>` instead of raw JSON payloads.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`Client`] converts between typed objects and [`RawObject`] and checks
//! that namespaced kinds carry a namespace. It never retries: conflicts are
//! returned to the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::Object;
use crate::core::ObjectDecodeError;
use crate::core::ObjectKey;
use crate::core::RawObject;
use crate::core::ResourceSpec;
use crate::interfaces::DeleteOutcome;
use crate::interfaces::ListParams;
use crate::interfaces::ObjectStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Client
// ============================================================================

/// Typed object store client; cheap to clone.
#[derive(Clone)]
pub struct Client {
    /// Backing store.
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Wraps a store.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
        }
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Reads an object.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read or decode fails.
    pub async fn get<S: ResourceSpec>(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Option<Object<S>>, StoreError> {
        let key = ObjectKey::of::<S>(scope::<S>(namespace)?, name);
        self.store.get(&key).await?.map(decode).transpose()
    }

    /// Lists objects of a kind.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the scan or decode fails.
    pub async fn list<S: ResourceSpec>(&self, params: &ListParams) -> Result<Vec<Object<S>>, StoreError> {
        self.store.list(S::KIND, params).await?.into_iter().map(decode).collect()
    }

    /// Creates an object.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    pub async fn create<S: ResourceSpec>(&self, object: &Object<S>) -> Result<Object<S>, StoreError> {
        decode(self.store.create(encode(object)?).await?)
    }

    /// Replaces metadata and spec.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] on a stale resource version.
    pub async fn update<S: ResourceSpec>(&self, object: &Object<S>) -> Result<Object<S>, StoreError> {
        decode(self.store.update(encode(object)?).await?)
    }

    /// Replaces status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] on a stale resource version.
    pub async fn update_status<S: ResourceSpec>(
        &self,
        object: &Object<S>,
    ) -> Result<Object<S>, StoreError> {
        decode(self.store.update_status(encode(object)?).await?)
    }

    /// Reads an object, applies `mutate`, and writes it back guarded by the
    /// version that was read.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the object is absent and
    /// [`StoreError::Conflict`] when it changed in between.
    pub async fn patch<S, F>(&self, namespace: Option<&str>, name: &str, mutate: F) -> Result<Object<S>, StoreError>
    where
        S: ResourceSpec,
        F: FnOnce(&mut Object<S>) + Send,
    {
        let Some(mut object) = self.get::<S>(namespace, name).await? else {
            return Err(StoreError::NotFound(ObjectKey::of::<S>(namespace, name).to_string()));
        };
        mutate(&mut object);
        self.update(&object).await
    }

    /// Requests deletion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the object is absent.
    pub async fn delete<S: ResourceSpec>(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DeleteOutcome, StoreError> {
        let key = ObjectKey::of::<S>(scope::<S>(namespace)?, name);
        self.store.delete(&key).await
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the namespace against the kind's scope.
fn scope<S: ResourceSpec>(namespace: Option<&str>) -> Result<Option<&str>, StoreError> {
    match (S::NAMESPACED, namespace) {
        (true, Some(namespace)) => Ok(Some(namespace)),
        (false, _) => Ok(None),
        (true, None) => Err(StoreError::Invalid(format!("{} requires a namespace", S::KIND))),
    }
}

/// Converts a typed object into raw form.
fn encode<S: ResourceSpec>(object: &Object<S>) -> Result<RawObject, StoreError> {
    scope::<S>(object.namespace())?;
    let mut raw = object.to_raw().map_err(|err| StoreError::Invalid(err.to_string()))?;
    if !S::NAMESPACED {
        raw.metadata.namespace = None;
    }
    Ok(raw)
}

/// Converts a raw object into typed form.
fn decode<S: ResourceSpec>(raw: RawObject) -> Result<Object<S>, StoreError> {
    Object::from_raw(raw).map_err(|err: ObjectDecodeError| StoreError::Invalid(err.to_string()))
}
