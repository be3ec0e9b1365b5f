// crates/dockyards-core/src/interfaces/mod.rs
// ============================================================================
// Module: Dockyards Interfaces
// Description: Backend-agnostic object store interface.
// Purpose: Define the contract consumed by the API and implemented by stores.
// Dependencies: async-trait, thiserror, crate::core
// ============================================================================

//! ## Overview
//! The object store is a declarative, versioned, indexed key-value store with
//! owner references, labels, and finalizers. Implementations must:
//! - assign uid, creation timestamp, generation, and resource version on create
//! - reject stale resource versions on update with [`StoreError::Conflict`]
//! - surface deletes as a deletion timestamp while finalizers remain
//! - purge objects whose finalizers drained and cascade to owned dependents
//!
//! Security posture: store contents are untrusted input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::ObjectKey;
use crate::core::RawObject;

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Object store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Target object (or its namespace) does not exist.
    #[error("object not found: {0}")]
    NotFound(String),
    /// An object with the same key exists.
    #[error("object already exists: {0}")]
    AlreadyExists(String),
    /// Resource version mismatch.
    #[error("object modified concurrently: {0}")]
    Conflict(String),
    /// Object data is invalid.
    #[error("object store invalid data: {0}")]
    Invalid(String),
    /// Store I/O error.
    #[error("object store io error: {0}")]
    Io(String),
    /// Store reported an error.
    #[error("object store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: List Parameters
// ============================================================================

/// Secondary index lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKey {
    /// Users by `spec.email`.
    UserEmail(String),
    /// Invitations by `spec.email`.
    InvitationEmail(String),
    /// Objects by owner uid.
    OwnerUid(String),
}

impl IndexKey {
    /// Returns true when the object matches the index value.
    #[must_use]
    pub fn matches(&self, object: &RawObject) -> bool {
        match self {
            Self::UserEmail(email) => {
                object.kind == "User" && spec_str(object, "email") == Some(email.as_str())
            }
            Self::InvitationEmail(email) => {
                object.kind == "Invitation" && spec_str(object, "email") == Some(email.as_str())
            }
            Self::OwnerUid(uid) => object.metadata.is_owned_by(uid),
        }
    }
}

/// Reads a string field from a raw spec.
fn spec_str<'a>(object: &'a RawObject, field: &str) -> Option<&'a str> {
    object.spec.get(field).and_then(serde_json::Value::as_str)
}

/// List filters. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Restrict to one namespace; `None` lists across namespaces.
    pub namespace: Option<String>,
    /// Required label values.
    pub labels: BTreeMap<String, String>,
    /// Optional index lookup.
    pub index: Option<IndexKey>,
}

impl ListParams {
    /// Lists within a namespace.
    #[must_use]
    pub fn in_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Self::default()
        }
    }

    /// Adds a required label value.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Sets the index lookup.
    #[must_use]
    pub fn with_index(mut self, index: IndexKey) -> Self {
        self.index = Some(index);
        self
    }

    /// Returns true when the object passes every filter.
    #[must_use]
    pub fn matches(&self, object: &RawObject) -> bool {
        if let Some(namespace) = &self.namespace
            && object.metadata.namespace.as_deref() != Some(namespace.as_str())
        {
            return false;
        }
        let labels_match = self
            .labels
            .iter()
            .all(|(key, value)| object.metadata.label(key) == Some(value.as_str()));
        labels_match && self.index.as_ref().is_none_or(|index| index.matches(object))
    }
}

// ============================================================================
// SECTION: Object Store
// ============================================================================

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// Finalizers remain; the object is readable with a deletion timestamp.
    Deleting(RawObject),
    /// The object was purged.
    Purged,
}

/// Declarative object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Reads an object by key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    async fn get(&self, key: &ObjectKey) -> Result<Option<RawObject>, StoreError>;

    /// Lists objects of a kind ordered by namespace then name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the scan fails.
    async fn list(&self, kind: &str, params: &ListParams) -> Result<Vec<RawObject>, StoreError>;

    /// Creates an object and returns the stored form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] on a key collision and
    /// [`StoreError::NotFound`] when the namespace is missing.
    async fn create(&self, object: RawObject) -> Result<RawObject, StoreError>;

    /// Replaces metadata and spec; status is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] on a stale resource version.
    async fn update(&self, object: RawObject) -> Result<RawObject, StoreError>;

    /// Replaces status only.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] on a stale resource version.
    async fn update_status(&self, object: RawObject) -> Result<RawObject, StoreError>;

    /// Requests deletion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the object does not exist.
    async fn delete(&self, key: &ObjectKey) -> Result<DeleteOutcome, StoreError>;
}
