// crates/dockyards-core/src/core/meta.rs
// ============================================================================
// Module: Dockyards Object Metadata
// Description: Declarative object metadata, owner references, and conditions.
// Purpose: Model the identity, lifecycle, and relationships of stored objects.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every stored object carries [`ObjectMeta`]: a generated opaque identifier, a
//! DNS-label name, timestamps, a resource version, finalizers, labels, and
//! typed owner back-references. Lifecycle state is derived from metadata, see
//! [`LifecycleState`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Object Metadata
// ============================================================================

/// Metadata shared by every stored object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Object name, unique per kind and namespace.
    #[serde(default)]
    pub name: String,
    /// Prefix used by the store to generate a name when `name` is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,
    /// Namespace for namespaced kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Store-generated opaque identifier.
    #[serde(default)]
    pub uid: String,
    /// Optimistic concurrency token; empty means "unconditional".
    #[serde(default)]
    pub resource_version: String,
    /// Spec generation counter.
    #[serde(default)]
    pub generation: u64,
    /// Creation timestamp assigned by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<Timestamp>,
    /// Deletion timestamp, set when a delete is pending on finalizers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<Timestamp>,
    /// Labels used for selection.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Free-form annotations.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// Owner back-references.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
    /// Finalizers blocking purge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,
}

impl ObjectMeta {
    /// Builds metadata for a cluster-scoped object.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds metadata for a namespaced object.
    #[must_use]
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
            ..Self::default()
        }
    }

    /// Returns a copy with the label set.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Returns a copy with the owner reference appended.
    #[must_use]
    pub fn with_owner(mut self, owner: OwnerReference) -> Self {
        self.owner_references.push(owner);
        self
    }

    /// Returns a copy with the finalizer appended.
    #[must_use]
    pub fn with_finalizer(mut self, finalizer: impl Into<String>) -> Self {
        self.finalizers.push(finalizer.into());
        self
    }

    /// Returns the label value for `key`.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Returns true when an owner reference points at `uid`.
    #[must_use]
    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.owner_references.iter().any(|owner| owner.uid == uid)
    }

    /// Returns the first owner reference of the given kind.
    #[must_use]
    pub fn owner_of_kind(&self, kind: &str) -> Option<&OwnerReference> {
        self.owner_references.iter().find(|owner| owner.kind == kind)
    }

    /// Returns the lifecycle state derived from the metadata.
    #[must_use]
    pub fn lifecycle(&self) -> LifecycleState {
        if self.deletion_timestamp.is_some() {
            LifecycleState::Deleting
        } else {
            LifecycleState::Active
        }
    }
}

/// Typed owner back-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    /// Owner kind.
    pub kind: String,
    /// Owner name.
    pub name: String,
    /// Owner uid.
    pub uid: String,
}

impl OwnerReference {
    /// Builds an owner reference from the owner's kind and metadata.
    #[must_use]
    pub fn to(kind: &str, owner: &ObjectMeta) -> Self {
        Self {
            kind: kind.to_string(),
            name: owner.name.clone(),
            uid: owner.uid.clone(),
        }
    }
}

// ============================================================================
// SECTION: Lifecycle
// ============================================================================

/// Lifecycle state of a stored object.
///
/// `Gone` is never observed on a readable object; it is what a `get` returning
/// nothing means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Object exists and is not being deleted.
    Active,
    /// Deletion requested; finalizers still pending.
    Deleting,
    /// Object purged from the store.
    Gone,
}

// ============================================================================
// SECTION: Conditions
// ============================================================================

/// Condition type reporting overall readiness.
pub const CONDITION_READY: &str = "Ready";

/// Status condition reported by controllers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition type, e.g. `Ready`.
    #[serde(rename = "type")]
    pub condition_type: String,
    /// `True`, `False`, or `Unknown`.
    pub status: String,
    /// Machine-readable reason.
    #[serde(default)]
    pub reason: String,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Time of the last status transition.
    pub last_transition_time: Timestamp,
}

/// Returns the condition of the given type.
#[must_use]
pub fn find_condition<'a>(conditions: &'a [Condition], condition_type: &str) -> Option<&'a Condition> {
    conditions.iter().find(|condition| condition.condition_type == condition_type)
}
