// crates/dockyards-api/src/handlers/mod.rs
// ============================================================================
// Module: Dockyards Resource Handlers
// Description: HTTP handlers for every public and tenant-scoped route.
// Purpose: Compose authorization, validation, projection, and persistence.
// Dependencies: axum, dockyards-core
// ============================================================================

//! ## Overview
//! Each handler runs the same pipeline: resolve the target organization and
//! authorize, parse and validate the body, map options onto stored objects,
//! persist, and project the response. The first failure ends the request.
//! Bodies are read as raw bytes and decoded only after authorization so an
//! outsider never learns anything from a validation message.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod clusters;
pub mod invitations;
pub mod members;
pub mod node_pools;
pub mod nodes;
pub mod organizations;
pub mod session;
pub mod users;

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

use crate::error::ApiError;

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Handler result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// 201 with a JSON body.
pub fn created<T: Serialize>(body: T) -> Response {
    (StatusCode::CREATED, Json(body)).into_response()
}

/// 202 with a JSON body.
pub fn accepted<T: Serialize>(body: T) -> Response {
    (StatusCode::ACCEPTED, Json(body)).into_response()
}

/// 202 without a body.
#[must_use]
pub fn accepted_empty() -> Response {
    StatusCode::ACCEPTED.into_response()
}
