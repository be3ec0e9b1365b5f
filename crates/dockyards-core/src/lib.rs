// crates/dockyards-core/src/lib.rs
// ============================================================================
// Module: Dockyards Core Library
// Description: Public API surface for the Dockyards object model and store.
// Purpose: Expose core types, the store interface, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Dockyards core models the declarative objects behind the cluster
//! management API (organizations, users, clusters, node pools, nodes,
//! invitations, and the release catalog) and the versioned object store that
//! holds them. It is transport-agnostic; the HTTP layer lives in
//! `dockyards-api`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::DeleteOutcome;
pub use interfaces::IndexKey;
pub use interfaces::ListParams;
pub use interfaces::ObjectStore;
pub use interfaces::StoreError;
pub use runtime::Client;
pub use runtime::InMemoryObjectStore;
pub use runtime::RecordTable;
