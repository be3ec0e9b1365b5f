// crates/dockyards-core/src/runtime/semantics.rs
// ============================================================================
// Module: Dockyards Store Semantics
// Description: Shared create/update/delete rules over a record table.
// Purpose: Give every store backend identical lifecycle behavior.
// Dependencies: uuid, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Backends provide a [`RecordTable`]: raw keyed storage plus a revision
//! counter. The functions here layer object-store semantics on top of it:
//! identity assignment, optimistic concurrency, two-phase deletion, and the
//! owner-reference garbage-collection cascade. Callers hold whatever lock or
//! transaction makes a single call atomic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;

use uuid::Uuid;

use crate::core::ObjectKey;
use crate::core::RawObject;
use crate::core::Timestamp;
use crate::core::generate_name;
use crate::core::is_dns_label;
use crate::interfaces::DeleteOutcome;
use crate::interfaces::IndexKey;
use crate::interfaces::ListParams;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Kind name of namespace objects.
const NAMESPACE_KIND: &str = "Namespace";
/// Kind name of user objects; their `spec.email` is unique store-wide.
const USER_KIND: &str = "User";
/// Attempts at generating a free name before giving up.
const MAX_GENERATE_NAME_ATTEMPTS: usize = 8;

// ============================================================================
// SECTION: Record Table
// ============================================================================

/// Raw keyed storage backing an object store.
pub trait RecordTable {
    /// Loads a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn load(&self, key: &ObjectKey) -> Result<Option<RawObject>, StoreError>;

    /// Scans records of a kind, optionally within a namespace, ordered by
    /// namespace then name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the scan fails.
    fn scan(&self, kind: &str, namespace: Option<&str>) -> Result<Vec<RawObject>, StoreError>;

    /// Returns every record owned by `uid`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the scan fails.
    fn dependents(&self, uid: &str) -> Result<Vec<RawObject>, StoreError>;

    /// Inserts or replaces a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn put(&mut self, object: &RawObject) -> Result<(), StoreError>;

    /// Removes a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn remove(&mut self, key: &ObjectKey) -> Result<(), StoreError>;

    /// Advances and returns the global revision counter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the counter cannot be advanced.
    fn next_revision(&mut self) -> Result<u64, StoreError>;
}

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Lists records matching `params`.
///
/// # Errors
///
/// Returns [`StoreError`] when the scan fails.
pub fn list_objects<T: RecordTable + ?Sized>(
    table: &T,
    kind: &str,
    params: &ListParams,
) -> Result<Vec<RawObject>, StoreError> {
    let records = table.scan(kind, params.namespace.as_deref())?;
    Ok(records.into_iter().filter(|object| params.matches(object)).collect())
}

/// Creates a record, assigning identity fields.
///
/// # Errors
///
/// Returns [`StoreError::Invalid`] for unusable names,
/// [`StoreError::NotFound`] for a missing namespace, and
/// [`StoreError::AlreadyExists`] on a key collision or a second user with
/// the same email.
pub fn create_object<T: RecordTable + ?Sized>(
    table: &mut T,
    mut object: RawObject,
) -> Result<RawObject, StoreError> {
    if let Some(namespace) = object.metadata.namespace.clone() {
        let namespace_key = ObjectKey {
            kind: NAMESPACE_KIND.to_string(),
            namespace: None,
            name: namespace.clone(),
        };
        if table.load(&namespace_key)?.is_none() {
            return Err(StoreError::NotFound(format!("namespace {namespace}")));
        }
    }
    if object.metadata.name.is_empty() {
        object.metadata.name = free_generated_name(table, &object)?;
    }
    if !is_dns_label(&object.metadata.name) {
        return Err(StoreError::Invalid(format!("invalid object name: {}", object.metadata.name)));
    }
    let key = object.key();
    if table.load(&key)?.is_some() {
        return Err(StoreError::AlreadyExists(key.to_string()));
    }
    ensure_unique_email(table, &object)?;
    object.metadata.uid = Uuid::new_v4().to_string();
    object.metadata.creation_timestamp = Some(Timestamp::now());
    object.metadata.deletion_timestamp = None;
    object.metadata.generation = 1;
    object.metadata.resource_version = table.next_revision()?.to_string();
    table.put(&object)?;
    Ok(object)
}

/// Replaces metadata and spec, or only status when `status_only` is set.
///
/// Identity fields and an existing deletion timestamp are preserved. A
/// deleting object whose finalizers drained is purged and its last state is
/// returned.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] when the record is absent,
/// [`StoreError::Conflict`] on a stale non-empty resource version, and
/// [`StoreError::AlreadyExists`] when a user takes another user's email.
pub fn update_object<T: RecordTable + ?Sized>(
    table: &mut T,
    object: RawObject,
    status_only: bool,
) -> Result<RawObject, StoreError> {
    let key = object.key();
    let Some(existing) = table.load(&key)? else {
        return Err(StoreError::NotFound(key.to_string()));
    };
    if !object.metadata.resource_version.is_empty()
        && object.metadata.resource_version != existing.metadata.resource_version
    {
        return Err(StoreError::Conflict(key.to_string()));
    }
    let mut next = if status_only {
        RawObject {
            status: object.status,
            ..existing.clone()
        }
    } else {
        let spec_changed = object.spec != existing.spec;
        let mut merged = RawObject {
            kind: existing.kind.clone(),
            metadata: object.metadata,
            spec: object.spec,
            status: existing.status.clone(),
        };
        merged.metadata.namespace.clone_from(&existing.metadata.namespace);
        merged.metadata.name.clone_from(&existing.metadata.name);
        if spec_changed {
            ensure_unique_email(table, &merged)?;
        }
        merged.metadata.generation =
            if spec_changed { existing.metadata.generation + 1 } else { existing.metadata.generation };
        merged
    };
    next.metadata.namespace.clone_from(&existing.metadata.namespace);
    next.metadata.name.clone_from(&existing.metadata.name);
    next.metadata.uid.clone_from(&existing.metadata.uid);
    next.metadata.creation_timestamp = existing.metadata.creation_timestamp;
    next.metadata.deletion_timestamp = existing.metadata.deletion_timestamp;
    next.metadata.resource_version = table.next_revision()?.to_string();
    if next.metadata.deletion_timestamp.is_some() && next.metadata.finalizers.is_empty() {
        purge(table, &next)?;
    } else {
        table.put(&next)?;
    }
    Ok(next)
}

/// Rejects a user whose email already belongs to another user.
fn ensure_unique_email<T: RecordTable + ?Sized>(table: &T, object: &RawObject) -> Result<(), StoreError> {
    if object.kind != USER_KIND {
        return Ok(());
    }
    let Some(email) = object.spec.get("email").and_then(serde_json::Value::as_str) else {
        return Ok(());
    };
    let index = IndexKey::UserEmail(email.to_string());
    let key = object.key();
    let taken = table.scan(USER_KIND, None)?.iter().any(|user| user.key() != key && index.matches(user));
    if taken {
        return Err(StoreError::AlreadyExists(format!("user with email {email}")));
    }
    Ok(())
}

/// Requests deletion of a record.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] when the record is absent.
pub fn delete_object<T: RecordTable + ?Sized>(
    table: &mut T,
    key: &ObjectKey,
) -> Result<DeleteOutcome, StoreError> {
    let Some(existing) = table.load(key)? else {
        return Err(StoreError::NotFound(key.to_string()));
    };
    mark_deleted(table, existing)
}

/// Marks a record as deleting or purges it when no finalizers remain.
fn mark_deleted<T: RecordTable + ?Sized>(
    table: &mut T,
    mut existing: RawObject,
) -> Result<DeleteOutcome, StoreError> {
    if existing.metadata.finalizers.is_empty() {
        purge(table, &existing)?;
        return Ok(DeleteOutcome::Purged);
    }
    if existing.metadata.deletion_timestamp.is_none() {
        existing.metadata.deletion_timestamp = Some(Timestamp::now());
        existing.metadata.resource_version = table.next_revision()?.to_string();
        table.put(&existing)?;
    }
    Ok(DeleteOutcome::Deleting(existing))
}

/// Removes a record and deletes its dependents breadth-first.
fn purge<T: RecordTable + ?Sized>(table: &mut T, object: &RawObject) -> Result<(), StoreError> {
    table.remove(&object.key())?;
    let mut pending: VecDeque<String> = VecDeque::from([object.metadata.uid.clone()]);
    while let Some(owner_uid) = pending.pop_front() {
        for dependent in table.dependents(&owner_uid)? {
            if dependent.metadata.deletion_timestamp.is_some() {
                continue;
            }
            let uid = dependent.metadata.uid.clone();
            if matches!(mark_deleted_shallow(table, dependent)?, DeleteOutcome::Purged) {
                pending.push_back(uid);
            }
        }
    }
    Ok(())
}

/// Like [`mark_deleted`] without recursing into dependents.
fn mark_deleted_shallow<T: RecordTable + ?Sized>(
    table: &mut T,
    mut existing: RawObject,
) -> Result<DeleteOutcome, StoreError> {
    if existing.metadata.finalizers.is_empty() {
        table.remove(&existing.key())?;
        return Ok(DeleteOutcome::Purged);
    }
    existing.metadata.deletion_timestamp = Some(Timestamp::now());
    existing.metadata.resource_version = table.next_revision()?.to_string();
    table.put(&existing)?;
    Ok(DeleteOutcome::Deleting(existing))
}

/// Picks an unused generated name.
fn free_generated_name<T: RecordTable + ?Sized>(
    table: &T,
    object: &RawObject,
) -> Result<String, StoreError> {
    let Some(prefix) = object.metadata.generate_name.as_deref() else {
        return Err(StoreError::Invalid("name or generateName is required".to_string()));
    };
    for _ in 0 .. MAX_GENERATE_NAME_ATTEMPTS {
        let candidate = generate_name(prefix);
        let key = ObjectKey {
            kind: object.kind.clone(),
            namespace: object.metadata.namespace.clone(),
            name: candidate.clone(),
        };
        if table.load(&key)?.is_none() {
            return Ok(candidate);
        }
    }
    Err(StoreError::AlreadyExists(format!("no free name for prefix {prefix}")))
}
