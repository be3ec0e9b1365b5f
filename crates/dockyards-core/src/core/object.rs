// crates/dockyards-core/src/core/object.rs
// ============================================================================
// Module: Dockyards Object Envelope
// Description: Typed and untyped object envelopes stored in the object store.
// Purpose: Bind a kind's spec and status types to shared object metadata.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A stored object is `metadata + spec + status`. [`ResourceSpec`] ties a spec
//! type to its kind name, scope, and status type; [`Object`] is the typed
//! envelope handlers work with and [`RawObject`] is the kind-erased form the
//! store persists.
//!
//! Security posture: raw objects are decoded from store bytes and must be
//! treated as untrusted until they convert into a typed [`Object`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::meta::ObjectMeta;
use crate::core::meta::OwnerReference;

// ============================================================================
// SECTION: Resource Spec
// ============================================================================

/// Spec type of a stored kind.
pub trait ResourceSpec:
    Serialize + DeserializeOwned + Clone + Default + fmt::Debug + Send + Sync + 'static
{
    /// Kind name used as the store partition.
    const KIND: &'static str;
    /// True when objects of this kind live inside a namespace.
    const NAMESPACED: bool;
    /// Status type written through the status subresource.
    type Status: Serialize + DeserializeOwned + Clone + Default + fmt::Debug + Send + Sync + 'static;
}

/// Status type for kinds without reported status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyStatus {}

// ============================================================================
// SECTION: Typed Object
// ============================================================================

/// Typed stored object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Object<S: ResourceSpec> {
    /// Object metadata.
    pub metadata: ObjectMeta,
    /// Desired state.
    #[serde(default)]
    pub spec: S,
    /// Observed state.
    #[serde(default)]
    pub status: S::Status,
}

impl<S: ResourceSpec> Object<S> {
    /// Builds an object with default status.
    #[must_use]
    pub fn new(metadata: ObjectMeta, spec: S) -> Self {
        Self {
            metadata,
            spec,
            status: S::Status::default(),
        }
    }

    /// Returns the object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns the object uid.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.metadata.uid
    }

    /// Returns the object namespace.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    /// Returns an owner reference pointing at this object.
    #[must_use]
    pub fn owner_reference(&self) -> OwnerReference {
        OwnerReference::to(S::KIND, &self.metadata)
    }

    /// Converts into the kind-erased form.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when spec or status fail to serialize.
    pub fn to_raw(&self) -> Result<RawObject, serde_json::Error> {
        Ok(RawObject {
            kind: S::KIND.to_string(),
            metadata: self.metadata.clone(),
            spec: serde_json::to_value(&self.spec)?,
            status: serde_json::to_value(&self.status)?,
        })
    }

    /// Converts from the kind-erased form.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectDecodeError`] when the kind differs or the payload does
    /// not decode.
    pub fn from_raw(raw: RawObject) -> Result<Self, ObjectDecodeError> {
        if raw.kind != S::KIND {
            return Err(ObjectDecodeError::KindMismatch {
                expected: S::KIND,
                actual: raw.kind,
            });
        }
        let spec = decode_or_default(raw.spec).map_err(ObjectDecodeError::Payload)?;
        let status = decode_or_default(raw.status).map_err(ObjectDecodeError::Payload)?;
        Ok(Self {
            metadata: raw.metadata,
            spec,
            status,
        })
    }
}

/// Decodes a JSON value, treating `null` as the type's default.
fn decode_or_default<T: DeserializeOwned + Default>(value: Value) -> Result<T, serde_json::Error> {
    if value.is_null() { Ok(T::default()) } else { serde_json::from_value(value) }
}

/// Errors converting raw objects into typed objects.
#[derive(Debug, thiserror::Error)]
pub enum ObjectDecodeError {
    /// Raw kind does not match the requested type.
    #[error("object kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        /// Expected kind.
        expected: &'static str,
        /// Kind found on the raw object.
        actual: String,
    },
    /// Spec or status payload failed to decode.
    #[error("object payload invalid: {0}")]
    Payload(serde_json::Error),
}

// ============================================================================
// SECTION: Raw Object
// ============================================================================

/// Kind-erased stored object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObject {
    /// Kind name.
    pub kind: String,
    /// Object metadata.
    pub metadata: ObjectMeta,
    /// Spec payload.
    #[serde(default)]
    pub spec: Value,
    /// Status payload.
    #[serde(default)]
    pub status: Value,
}

impl RawObject {
    /// Returns the store key of this object.
    #[must_use]
    pub fn key(&self) -> ObjectKey {
        ObjectKey {
            kind: self.kind.clone(),
            namespace: self.metadata.namespace.clone(),
            name: self.metadata.name.clone(),
        }
    }
}

/// Store key: kind, optional namespace, and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    /// Kind name.
    pub kind: String,
    /// Namespace for namespaced kinds.
    pub namespace: Option<String>,
    /// Object name.
    pub name: String,
}

impl ObjectKey {
    /// Builds a key for a typed kind.
    #[must_use]
    pub fn of<S: ResourceSpec>(namespace: Option<&str>, name: &str) -> Self {
        Self {
            kind: S::KIND.to_string(),
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}/{}/{}", self.kind, namespace, self.name),
            None => write!(f, "{}/{}", self.kind, self.name),
        }
    }
}
