// crates/dockyards-api/src/handlers/users.rs
// ============================================================================
// Module: User Handlers
// Description: Sign-up, password change, and whoami.
// Purpose: Manage local user accounts.
// Dependencies: axum, dockyards-core
// ============================================================================

//! ## Overview
//! Sign-up is public but only enabled while the `user-sign-up` feature object
//! exists in the global namespace; otherwise the route answers 404. Stored
//! passwords are bcrypt hashes and never leave the store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Extension;
use axum::Json;
use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::State;
use axum::response::Response;
use dockyards_core::FEATURE_USER_SIGN_UP;
use dockyards_core::FeatureSpec;
use dockyards_core::IndexKey;
use dockyards_core::ListParams;
use dockyards_core::ObjectMeta;
use dockyards_core::User;
use dockyards_core::UserSpec;

use super::ApiResult;
use super::accepted_empty;
use super::created;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::projection::user_name_prefix;
use crate::projection::user_view;
use crate::state::ApiState;
use crate::types::PasswordOptions;
use crate::types::SignUpOptions;
use crate::types::UserView;
use crate::validation::hash_password;
use crate::validation::parse_body;
use crate::validation::required;
use crate::validation::validate_display_name;
use crate::validation::validate_email;
use crate::validation::validate_password;
use crate::validation::verify_password;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Provider marker for locally registered users.
pub const LOCAL_PROVIDER_ID: &str = "dockyards://";

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `POST /v1/users`: public sign-up.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] while sign-up is disabled,
/// [`ApiError::Validation`] for bad options, and [`ApiError::Conflict`] when
/// the email is registered.
pub async fn sign_up(State(state): State<ApiState>, body: Bytes) -> ApiResult<Response> {
    let enabled =
        state.client.get::<FeatureSpec>(Some(state.global_namespace()), FEATURE_USER_SIGN_UP).await?.is_some();
    if !enabled {
        return Err(ApiError::NotFound("sign-up is disabled".to_string()));
    }
    let options: SignUpOptions = parse_body(&body)?;
    let email = required("email", options.email.as_deref())?;
    validate_email(email)?;
    let password = required("password", options.password.as_deref())?;
    validate_password("password", password)?;
    validate_display_name(options.display_name.as_deref())?;

    let existing =
        state.client.list::<UserSpec>(&ListParams::default().with_index(IndexKey::UserEmail(email.to_string()))).await?;
    if !existing.is_empty() {
        return Err(ApiError::Conflict("email is already registered".to_string()));
    }

    let hash = hash_password(password.to_string(), state.settings.bcrypt_cost).await?;
    let user = User::new(
        ObjectMeta {
            generate_name: Some(user_name_prefix(email)),
            ..ObjectMeta::default()
        },
        UserSpec {
            email: email.to_string(),
            password: hash,
            display_name: options.display_name.clone(),
            provider_id: Some(LOCAL_PROVIDER_ID.to_string()),
        },
    );
    let user = state.client.create(&user).await?;
    Ok(created(user_view(&user)))
}

/// `POST /v1/users/{name}/password`: the caller changes their own password.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when `name` is not the caller or the
/// old password does not verify, [`ApiError::Validation`] for a bad new
/// password, and [`ApiError::Conflict`] when the user changed concurrently.
pub async fn change_password(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(name): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    if user.name() != name {
        return Err(ApiError::unauthorized("password change for another user"));
    }
    let options: PasswordOptions = parse_body(&body)?;
    let old_password = options.old_password.unwrap_or_default();
    let mut stored = user.0;
    if !verify_password(old_password, stored.spec.password.clone()).await? {
        return Err(ApiError::unauthorized("old password does not match"));
    }
    let new_password = required("newPassword", options.new_password.as_deref())?;
    validate_password("newPassword", new_password)?;
    stored.spec.password = hash_password(new_password.to_string(), state.settings.bcrypt_cost).await?;
    state.client.update(&stored).await?;
    Ok(accepted_empty())
}

/// `GET /v1/whoami`.
pub async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> Json<UserView> {
    Json(user_view(&user.0))
}
