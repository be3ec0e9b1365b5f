// crates/dockyards-core/src/runtime/mod.rs
// ============================================================================
// Module: Dockyards Runtime
// Description: Store semantics, the in-memory store, and the typed client.
// Purpose: Execute object-store operations with consistent lifecycle rules.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the object-store semantics shared by every
//! backend, an in-memory backend, and the typed client the API uses. All
//! backends must call into [`semantics`] to preserve identical behavior.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod client;
pub mod memory;
pub mod semantics;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::Client;
pub use memory::InMemoryObjectStore;
pub use semantics::RecordTable;
