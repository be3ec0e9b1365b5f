// crates/dockyards-api/src/auth.rs
// ============================================================================
// Module: Dockyards Authentication
// Description: Bearer token parsing, identity resolution, and the auth filter.
// Purpose: Fail closed on every credential problem before handlers run.
// Dependencies: axum, dockyards-core
// ============================================================================

//! ## Overview
//! Every non-public route sits behind [`require_user`]. It parses the
//! `Authorization: Bearer` header, verifies the token with the access key,
//! loads the user named by `sub`, and attaches [`AuthenticatedUser`] to the
//! request. A missing header, malformed scheme, bad signature, expired token,
//! or vanished user all end in 401. Each decision is audited with a token
//! fingerprint; raw tokens are never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use dockyards_core::User;
use dockyards_core::UserSpec;

use crate::audit::AuthnAuditEvent;
use crate::audit::token_fingerprint;
use crate::error::ApiError;
use crate::state::ApiState;
use crate::tokens::TokenKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest accepted `Authorization` header.
const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// User resolved by the auth filter.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    /// Returns the user name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Returns the user uid.
    #[must_use]
    pub fn uid(&self) -> &str {
        self.0.uid()
    }

    /// Returns the user email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.0.spec.email
    }
}

/// Subject name copied onto responses for request auditing.
#[derive(Debug, Clone)]
pub struct AuthenticatedSubject(pub String);

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Authenticates the request with an access token.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] on any credential failure.
pub async fn require_user(
    State(state): State<ApiState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers(), TokenKind::Access).await?;
    let subject = AuthenticatedSubject(user.name().to_string());
    request.extensions_mut().insert(AuthenticatedUser(user));
    let mut response = next.run(request).await;
    response.extensions_mut().insert(subject);
    Ok(response)
}

/// Verifies the bearer token of `kind` and loads its user.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] when the header, token, or user is
/// unusable, and [`ApiError::Internal`] when the user lookup fails.
pub async fn authenticate(
    state: &ApiState,
    headers: &HeaderMap,
    kind: TokenKind,
) -> Result<User, ApiError> {
    let token = match parse_bearer_token(headers) {
        Ok(token) => token,
        Err(err) => {
            state.audit.record_authn(&AuthnAuditEvent::denied(kind.label(), None, &err.to_string()));
            return Err(err);
        }
    };
    let fingerprint = token_fingerprint(&token);
    let claims = match state.tokens.verify(kind, &token) {
        Ok(claims) => claims,
        Err(err) => {
            state.audit.record_authn(&AuthnAuditEvent::denied(
                kind.label(),
                Some(fingerprint),
                &err.to_string(),
            ));
            return Err(ApiError::Unauthenticated(err.to_string()));
        }
    };
    let Some(user) = state.client.get::<UserSpec>(None, &claims.sub).await? else {
        state.audit.record_authn(&AuthnAuditEvent::denied(
            kind.label(),
            Some(fingerprint),
            "subject no longer exists",
        ));
        return Err(ApiError::Unauthenticated("unknown subject".to_string()));
    };
    state.audit.record_authn(&AuthnAuditEvent::allowed(kind.label(), user.name(), Some(fingerprint)));
    Ok(user)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts the token from an `Authorization: Bearer` header.
fn parse_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthenticated("missing authorization".to_string()))?;
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return Err(ApiError::Unauthenticated("authorization header too large".to_string()));
    }
    let header = header
        .to_str()
        .map_err(|_| ApiError::Unauthenticated("authorization header not ascii".to_string()))?;
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(ApiError::Unauthenticated("invalid authorization header".to_string()));
    }
    Ok(token.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
