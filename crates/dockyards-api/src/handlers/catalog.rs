// crates/dockyards-api/src/handlers/catalog.rs
// ============================================================================
// Module: Catalog Handlers
// Description: Global cluster templates and releases.
// Purpose: Expose and resolve catalog defaults.
// Dependencies: axum, dockyards-core
// ============================================================================

//! ## Overview
//! Catalog objects live in the global namespace and are readable by any
//! authenticated user. A label value of `"true"` marks the default template
//! and the default release; cluster creation falls back to both.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::State;
use dockyards_core::ClusterTemplate;
use dockyards_core::ClusterTemplateSpec;
use dockyards_core::LABEL_DEFAULT_CLUSTER_TEMPLATE;
use dockyards_core::LABEL_DEFAULT_RELEASE;
use dockyards_core::ListParams;
use dockyards_core::ReleaseSpec;

use super::ApiResult;
use crate::error::ApiError;
use crate::projection::DEFAULT_MARKER;
use crate::projection::cluster_template_view;
use crate::projection::release_view;
use crate::state::ApiState;
use crate::types::ClusterTemplateView;
use crate::types::ReleaseView;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /v1/cluster-templates`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when the store fails.
pub async fn list_cluster_templates(State(state): State<ApiState>) -> ApiResult<Json<Vec<ClusterTemplateView>>> {
    let templates =
        state.client.list::<ClusterTemplateSpec>(&ListParams::in_namespace(state.global_namespace())).await?;
    Ok(Json(templates.iter().map(cluster_template_view).collect()))
}

/// `GET /v1/releases`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when the store fails.
pub async fn list_releases(State(state): State<ApiState>) -> ApiResult<Json<Vec<ReleaseView>>> {
    let releases = state.client.list::<ReleaseSpec>(&ListParams::in_namespace(state.global_namespace())).await?;
    Ok(Json(releases.iter().map(release_view).collect()))
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Latest version of the default release, if any.
pub(crate) async fn default_release_version(state: &ApiState) -> Result<Option<String>, ApiError> {
    let params = ListParams::in_namespace(state.global_namespace()).with_label(LABEL_DEFAULT_RELEASE, DEFAULT_MARKER);
    let releases = state.client.list::<ReleaseSpec>(&params).await?;
    Ok(releases.into_iter().find_map(|release| release.status.latest_version))
}

/// Resolves a named template, or the default one when `name` is absent.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when a named template does not exist.
pub(crate) async fn resolve_cluster_template(
    state: &ApiState,
    name: Option<&str>,
) -> Result<Option<ClusterTemplate>, ApiError> {
    if let Some(name) = name {
        let template = state.client.get::<ClusterTemplateSpec>(Some(state.global_namespace()), name).await?;
        return template
            .map(Some)
            .ok_or_else(|| ApiError::validation(format!("cluster template {name} does not exist")));
    }
    let params =
        ListParams::in_namespace(state.global_namespace()).with_label(LABEL_DEFAULT_CLUSTER_TEMPLATE, DEFAULT_MARKER);
    Ok(state.client.list::<ClusterTemplateSpec>(&params).await?.into_iter().next())
}
