// crates/dockyards-api/src/error.rs
// ============================================================================
// Module: Dockyards API Errors
// Description: Central translation from pipeline failures to HTTP responses.
// Purpose: Keep status codes and response bodies consistent across handlers.
// Dependencies: axum, serde, thiserror, dockyards-core
// ============================================================================

//! ## Overview
//! Every handler returns [`ApiError`] and stops at the first failure. The
//! translation to HTTP lives in one place:
//!
//! | Variant | Status | Body |
//! |---|---|---|
//! | `Unauthenticated`, `Unauthorized` | 401 | empty |
//! | `NotFound` | 404 | empty |
//! | `Conflict` | 409 | `{"message"}` |
//! | `Validation` | 422 | `{"message"}` |
//! | `Internal` | 500 | `{"message": "internal error"}` |
//!
//! Authentication and authorization share one status so callers outside a
//! tenant cannot probe for resource existence. Internal details stay in the
//! audit log and never reach the response.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use dockyards_core::StoreError;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Request pipeline failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Missing, malformed, expired, or unknown credentials.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// Caller lacks the role for the operation or is outside the tenant.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Target resource is absent and the caller may know that.
    #[error("not found: {0}")]
    NotFound(String),
    /// Name collision or stale resource version.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Request failed semantic validation.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Store or runtime failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a short label for audit events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Validation(_) => "validation",
            Self::Internal(_) => "internal",
        }
    }

    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for an authorization failure.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }
}

/// Minimal JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    /// Human-readable reason.
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Unauthenticated(_) | Self::Unauthorized(_) | Self::NotFound(_) => {
                status.into_response()
            }
            Self::Conflict(message) | Self::Validation(message) => {
                (status, Json(ErrorBody {
                    message,
                }))
                    .into_response()
            }
            Self::Internal(_) => (status, Json(ErrorBody {
                message: "internal error",
            }))
                .into_response(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(key) => Self::NotFound(key),
            StoreError::AlreadyExists(key) => Self::Conflict(format!("{key} already exists")),
            StoreError::Conflict(key) => Self::Conflict(format!("{key} was modified concurrently")),
            StoreError::Invalid(message) => Self::Internal(format!("store rejected object: {message}")),
            StoreError::Io(message) | StoreError::Store(message) => Self::Internal(message),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
