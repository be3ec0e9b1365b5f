// crates/dockyards-api/src/handlers/session.rs
// ============================================================================
// Module: Session Handlers
// Description: Login with a password and token refresh.
// Purpose: Issue access and refresh token pairs.
// Dependencies: axum, dockyards-core
// ============================================================================

//! ## Overview
//! Both routes are public and both answer with a fresh [`TokenPair`]. Refresh
//! accepts only a token signed with the refresh key; an access token, an
//! expired token, or a token whose user was deleted all end in 401.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use dockyards_core::IndexKey;
use dockyards_core::ListParams;
use dockyards_core::UserSpec;

use super::ApiResult;
use crate::audit::AuthnAuditEvent;
use crate::auth::authenticate;
use crate::error::ApiError;
use crate::state::ApiState;
use crate::tokens::TokenKind;
use crate::tokens::TokenPair;
use crate::types::LoginOptions;
use crate::validation::parse_body;
use crate::validation::required;
use crate::validation::verify_password;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `POST /v1/login`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] for an unknown email or a wrong
/// password. Unknown emails are checked against a stand-in hash so both
/// failures do the same bcrypt work.
pub async fn login(State(state): State<ApiState>, body: Bytes) -> ApiResult<Json<TokenPair>> {
    let options: LoginOptions = parse_body(&body)?;
    let email = required("email", options.email.as_deref())?;
    let password = required("password", options.password.as_deref())?;

    let params = ListParams::default().with_index(IndexKey::UserEmail(email.to_string()));
    let user = state.client.list::<UserSpec>(&params).await?.into_iter().next();
    let hash = user
        .as_ref()
        .map_or_else(|| state.settings.unknown_user_hash.clone(), |user| user.spec.password.clone());
    let verified = verify_password(password.to_string(), hash).await?;
    let Some(user) = user.filter(|_| verified) else {
        state.audit.record_authn(&AuthnAuditEvent::denied("password", None, "invalid credentials"));
        return Err(ApiError::Unauthenticated("invalid credentials".to_string()));
    };
    state.audit.record_authn(&AuthnAuditEvent::allowed("password", user.name(), None));
    issue(&state, user.name())
}

/// `POST /v1/refresh` with `Authorization: Bearer <refresh token>`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] unless the bearer token is a valid
/// refresh token for an existing user.
pub async fn refresh(State(state): State<ApiState>, headers: HeaderMap) -> ApiResult<Json<TokenPair>> {
    let user = authenticate(&state, &headers, TokenKind::Refresh).await?;
    issue(&state, user.name())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Mints a token pair for `subject`.
fn issue(state: &ApiState, subject: &str) -> ApiResult<Json<TokenPair>> {
    state.tokens.issue_pair(subject).map(Json).map_err(|err| ApiError::Internal(err.to_string()))
}
