// crates/dockyards-api/src/state.rs
// ============================================================================
// Module: Dockyards API State
// Description: Process-wide handles shared by every request handler.
// Purpose: Bundle the store client, token service, audit sink, and limits.
// Dependencies: dockyards-core
// ============================================================================

//! ## Overview
//! Handlers are stateless; [`ApiState`] only carries read-only handles. The
//! object store behind [`Client`] is the single source of mutable state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use dockyards_core::Client;

use crate::audit::AuditSink;
use crate::tokens::TokenService;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Runtime limits injected at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Namespace holding catalog objects, features, and signing keys.
    pub global_namespace: String,
    /// Upper bound for node pool replicas.
    pub max_replicas: u32,
    /// bcrypt work factor for new hashes.
    pub bcrypt_cost: u32,
    /// Hash verified by login when the email matches no user.
    pub unknown_user_hash: String,
    /// Request body size cap in bytes.
    pub max_body_bytes: usize,
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct ApiState {
    /// Typed object store client.
    pub client: Client,
    /// Token minting and verification.
    pub tokens: Arc<TokenService>,
    /// Audit event sink.
    pub audit: Arc<dyn AuditSink>,
    /// Runtime limits.
    pub settings: Arc<ApiSettings>,
}

impl ApiState {
    /// Returns the global namespace name.
    #[must_use]
    pub fn global_namespace(&self) -> &str {
        &self.settings.global_namespace
    }
}
