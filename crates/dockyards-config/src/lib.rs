// crates/dockyards-config/src/lib.rs
// ============================================================================
// Module: Dockyards Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for dockyards.toml semantics.
// Dependencies: dockyards-core, serde, toml
// ============================================================================

//! ## Overview
//! `dockyards-config` defines the canonical configuration model for the
//! Dockyards API server. It provides strict, fail-closed validation and a
//! deterministic example file.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
