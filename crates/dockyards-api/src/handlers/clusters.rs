// crates/dockyards-api/src/handlers/clusters.rs
// ============================================================================
// Module: Cluster Handlers
// Description: CRUD for clusters inside an organization namespace.
// Purpose: Create clusters with their initial node pools.
// Dependencies: axum, dockyards-core
// ============================================================================

//! ## Overview
//! Cluster creation validates everything up front: the name, the version
//! (falling back to the default release), and the initial node pools, which
//! come from explicit options, a named template, or the default template.
//! Only then are the cluster and its pools written. Updates may only change
//! the version.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use axum::Extension;
use axum::Json;
use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::State;
use axum::response::Response;
use dockyards_core::Cluster;
use dockyards_core::ClusterSpec;
use dockyards_core::FINALIZER_DOCKYARDS;
use dockyards_core::LABEL_CLUSTER_NAME;
use dockyards_core::LABEL_ORGANIZATION_NAME;
use dockyards_core::ListParams;
use dockyards_core::NodePool;
use dockyards_core::NodePoolSpec;
use dockyards_core::ObjectMeta;

use super::ApiResult;
use super::accepted;
use super::accepted_empty;
use super::catalog::default_release_version;
use super::catalog::resolve_cluster_template;
use super::created;
use super::node_pools::load_cluster;
use super::node_pools::new_node_pool;
use super::node_pools::pools_of;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::membership::OrgAccess;
use crate::membership::authorize;
use crate::policy::Operation;
use crate::projection::apply_node_pool_changes;
use crate::projection::cluster_view;
use crate::state::ApiState;
use crate::types::ClusterOptions;
use crate::types::ClusterView;
use crate::validation::NodePoolIntent;
use crate::validation::parse_body;
use crate::validation::required;
use crate::validation::validate_name;
use crate::validation::validate_node_pool;
use crate::validation::validate_version;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /v1/orgs/{org}/clusters`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for non-members.
pub async fn list_clusters(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(org): Path<String>,
) -> ApiResult<Json<Vec<ClusterView>>> {
    let access = authorize(&state, &user, &org, Operation::ListClusters).await?;
    let namespace = access.namespace()?;
    let clusters = state.client.list::<ClusterSpec>(&ListParams::in_namespace(namespace)).await?;
    let pools = state.client.list::<NodePoolSpec>(&ListParams::in_namespace(namespace)).await?;
    Ok(Json(
        clusters
            .iter()
            .map(|cluster| {
                let owned: Vec<NodePool> = pools
                    .iter()
                    .filter(|pool| pool.metadata.label(LABEL_CLUSTER_NAME) == Some(cluster.name()))
                    .cloned()
                    .collect();
                cluster_view(cluster, &owned)
            })
            .collect(),
    ))
}

/// `GET /v1/orgs/{org}/clusters/{name}`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for non-members and
/// [`ApiError::NotFound`] when the cluster is absent.
pub async fn get_cluster(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, name)): Path<(String, String)>,
) -> ApiResult<Json<ClusterView>> {
    let access = authorize(&state, &user, &org, Operation::GetCluster).await?;
    let cluster = load_cluster(&state, access.namespace()?, &name).await?;
    let pools = pools_of(&state, &cluster).await?;
    Ok(Json(cluster_view(&cluster, &pools)))
}

/// `POST /v1/orgs/{org}/clusters`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for bad options or an unknown template
/// and [`ApiError::Conflict`] when the name is taken.
pub async fn create_cluster(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(org): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    let access = authorize(&state, &user, &org, Operation::CreateCluster).await?;
    let options: ClusterOptions = parse_body(&body)?;
    let name = required("name", options.name.as_deref())?;
    validate_name("name", name)?;
    let version = match options.version.as_deref() {
        Some(version) => {
            validate_version(version)?;
            Some(version.to_string())
        }
        None => default_release_version(&state).await?,
    };
    let planned = plan_node_pools(&state, &options).await?;

    let cluster = Cluster::new(cluster_metadata(&access, name)?, ClusterSpec {
        version,
    });
    let blueprints = planned
        .into_iter()
        .map(|(requested, spec)| new_node_pool(&cluster, &requested, spec))
        .collect::<Result<Vec<_>, _>>()?;

    let cluster = state.client.create(&cluster).await?;
    let mut pools = Vec::with_capacity(blueprints.len());
    for mut pool in blueprints {
        pool.metadata.owner_references = vec![cluster.owner_reference()];
        pools.push(state.client.create(&pool).await?);
    }
    Ok(created(cluster_view(&cluster, &pools)))
}

/// `PATCH /v1/orgs/{org}/clusters/{name}`: only `version` may change.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for a rename or any field other than
/// `version`, and [`ApiError::NotFound`] when the cluster is absent.
pub async fn update_cluster(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, name)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Response> {
    let access = authorize(&state, &user, &org, Operation::UpdateCluster).await?;
    let options: ClusterOptions = parse_body(&body)?;
    if options.name.is_some() {
        return Err(ApiError::validation("cluster name is immutable"));
    }
    if options.cluster_template.is_some()
        || options.node_pool_options.is_some()
        || options.no_default_node_pools.is_some()
    {
        return Err(ApiError::validation("only version may be updated"));
    }
    if let Some(version) = options.version.as_deref() {
        validate_version(version)?;
    }

    let mut cluster = load_cluster(&state, access.namespace()?, &name).await?;
    if options.version.is_some() {
        cluster.spec.version = options.version;
        cluster = state.client.update(&cluster).await?;
    }
    let pools = pools_of(&state, &cluster).await?;
    Ok(accepted(cluster_view(&cluster, &pools)))
}

/// `DELETE /v1/orgs/{org}/clusters/{name}`: two-phase delete.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for readers and outsiders and
/// [`ApiError::NotFound`] when the cluster is absent.
pub async fn delete_cluster(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, name)): Path<(String, String)>,
) -> ApiResult<Response> {
    let access = authorize(&state, &user, &org, Operation::DeleteCluster).await?;
    state.client.delete::<ClusterSpec>(Some(access.namespace()?), &name).await?;
    Ok(accepted_empty())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Metadata for a new cluster in the organization namespace.
fn cluster_metadata(access: &OrgAccess, name: &str) -> Result<ObjectMeta, ApiError> {
    Ok(ObjectMeta::namespaced(access.namespace()?, name)
        .with_owner(access.organization.owner_reference())
        .with_label(LABEL_ORGANIZATION_NAME, access.organization.name())
        .with_finalizer(FINALIZER_DOCKYARDS))
}

/// Resolves the initial node pools as `(requested name, spec)` pairs.
async fn plan_node_pools(
    state: &ApiState,
    options: &ClusterOptions,
) -> Result<Vec<(String, NodePoolSpec)>, ApiError> {
    let planned = if let Some(pool_options) = &options.node_pool_options {
        let mut planned = Vec::with_capacity(pool_options.len());
        for pool in pool_options {
            let changes = validate_node_pool(pool, NodePoolIntent::Create, state.settings.max_replicas)?;
            let mut spec = NodePoolSpec::default();
            apply_node_pool_changes(&mut spec, &changes);
            planned.push((changes.name.unwrap_or_default(), spec));
        }
        planned
    } else if options.no_default_node_pools == Some(true) {
        Vec::new()
    } else {
        resolve_cluster_template(state, options.cluster_template.as_deref())
            .await?
            .map(|template| {
                template.spec.node_pool_templates.into_iter().map(|pool| (pool.name, pool.spec)).collect()
            })
            .unwrap_or_default()
    };

    let mut seen = BTreeSet::new();
    for (requested, _) in &planned {
        if !seen.insert(requested.as_str()) {
            return Err(ApiError::validation(format!("node pool {requested} is duplicated")));
        }
    }
    Ok(planned)
}
