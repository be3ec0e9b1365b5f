// crates/dockyards-api/src/lib.rs
// ============================================================================
// Module: Dockyards API
// Description: Authenticated REST surface over the dockyards object store.
// Purpose: Project stored resources into API views behind tenancy checks.
// Dependencies: axum, jsonwebtoken, bcrypt, dockyards-core, dockyards-config
// ============================================================================

//! ## Overview
//! Dockyards API serves the `/v1` REST surface for organizations, members,
//! invitations, clusters, node pools, nodes, and the shared catalog. Every
//! protected request is authenticated with an `EdDSA` access token, resolved
//! to an organization membership, and checked against the role policy before
//! any stored object is read or written. Handlers are thin projections over
//! [`dockyards_core::Client`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod membership;
pub mod policy;
pub mod projection;
pub mod routes;
pub mod server;
pub mod state;
pub mod tokens;
pub mod types;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::AuthnAuditEvent;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestAuditEvent;
pub use audit::SecurityAuditEvent;
pub use audit::StderrAuditSink;
pub use auth::AuthenticatedUser;
pub use error::ApiError;
pub use membership::OrgAccess;
pub use policy::Operation;
pub use routes::router;
pub use server::ApiServer;
pub use server::ApiServerError;
pub use state::ApiSettings;
pub use state::ApiState;
pub use tokens::Claims;
pub use tokens::TokenError;
pub use tokens::TokenKind;
pub use tokens::TokenPair;
pub use tokens::TokenService;
