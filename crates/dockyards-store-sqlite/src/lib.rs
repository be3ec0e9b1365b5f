// crates/dockyards-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Object Store
// Description: Durable ObjectStore backend using SQLite WAL.
// Purpose: Provide single-node persistence for Dockyards objects.
// Dependencies: dockyards-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`dockyards_core::ObjectStore`]. Each
//! call runs in one transaction and applies the same lifecycle semantics as
//! the in-memory store. Security posture: database contents are untrusted
//! and are size-checked and decoded fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_OBJECT_BYTES;
pub use store::SqliteObjectStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
