// crates/dockyards-api/src/handlers/node_pools.rs
// ============================================================================
// Module: Node Pool Handlers
// Description: CRUD for node pools under a cluster.
// Purpose: Apply node pool options onto stored specs with immutable names.
// Dependencies: axum, dockyards-core
// ============================================================================

//! ## Overview
//! A node pool requested as `workers` under cluster `alpha` is stored as
//! `alpha-workers`, owned by the cluster and labelled with its name. Paths
//! address pools by the requested name. Updates merge the provided fields;
//! storage resources, when given, replace the stored list.

// ============================================================================
// SECTION: Imports
// ============================================================================

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
use dockyards_core::LABEL_NODE_POOL_NAME;
use dockyards_core::ListParams;
use dockyards_core::NodePool;
use dockyards_core::NodePoolSpec;
use dockyards_core::NodeSpec;
use dockyards_core::ObjectMeta;
use dockyards_core::is_dns_label;

use super::ApiResult;
use super::accepted;
use super::accepted_empty;
use super::created;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::membership::authorize;
use crate::membership::resolve;
use crate::policy::Operation;
use crate::projection::apply_node_pool_changes;
use crate::projection::node_pool_view;
use crate::projection::node_view;
use crate::projection::sort_nodes;
use crate::projection::stored_node_pool_name;
use crate::state::ApiState;
use crate::types::NodePoolOptions;
use crate::types::NodePoolView;
use crate::validation::NodePoolIntent;
use crate::validation::parse_body;
use crate::validation::validate_name;
use crate::validation::validate_node_pool;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /v1/orgs/{org}/clusters/{cluster}/node-pools`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for non-members and
/// [`ApiError::NotFound`] when the cluster is absent.
pub async fn list_node_pools(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, cluster)): Path<(String, String)>,
) -> ApiResult<Json<Vec<NodePoolView>>> {
    let access = authorize(&state, &user, &org, Operation::ListNodePools).await?;
    let namespace = access.namespace()?;
    let cluster = load_cluster(&state, namespace, &cluster).await?;
    let pools = pools_of(&state, &cluster).await?;
    Ok(Json(pools.iter().map(|pool| node_pool_view(&cluster, pool, None)).collect()))
}

/// `POST /v1/orgs/{org}/clusters/{cluster}/node-pools`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for bad options, [`ApiError::NotFound`]
/// when the cluster is absent, and [`ApiError::Conflict`] when the name is
/// taken.
pub async fn create_node_pool(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, cluster)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Response> {
    let access = authorize(&state, &user, &org, Operation::CreateNodePool).await?;
    let options: NodePoolOptions = parse_body(&body)?;
    let changes = validate_node_pool(&options, NodePoolIntent::Create, state.settings.max_replicas)?;
    let namespace = access.namespace()?;
    let cluster = load_cluster(&state, namespace, &cluster).await?;

    let mut spec = NodePoolSpec::default();
    apply_node_pool_changes(&mut spec, &changes);
    let requested = changes.name.as_deref().unwrap_or_default();
    let pool = new_node_pool(&cluster, requested, spec)?;
    let pool = state.client.create(&pool).await?;
    Ok(created(node_pool_view(&cluster, &pool, None)))
}

/// `GET /v1/orgs/{org}/clusters/{cluster}/node-pools/{name}`, with nodes.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for non-members and
/// [`ApiError::NotFound`] when the cluster or pool is absent.
pub async fn get_node_pool(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, cluster, name)): Path<(String, String, String)>,
) -> ApiResult<Json<NodePoolView>> {
    let access = authorize(&state, &user, &org, Operation::GetNodePool).await?;
    let namespace = access.namespace()?;
    let cluster = load_cluster(&state, namespace, &cluster).await?;
    let pool = load_node_pool(&state, &cluster, &name).await?;

    let params = ListParams::in_namespace(namespace).with_label(LABEL_NODE_POOL_NAME, pool.name());
    let mut nodes = state.client.list::<NodeSpec>(&params).await?;
    sort_nodes(&mut nodes);
    let nodes = nodes.iter().map(node_view).collect();
    Ok(Json(node_pool_view(&cluster, &pool, Some(nodes))))
}

/// `PATCH /v1/orgs/{org}/clusters/{cluster}/node-pools/{name}`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for bad options or any rename attempt by
/// a member, [`ApiError::Unauthorized`] for outsiders and readers,
/// [`ApiError::NotFound`] when the pool is absent, and
/// [`ApiError::Conflict`] when it changed concurrently.
pub async fn update_node_pool(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, cluster, name)): Path<(String, String, String)>,
    body: Bytes,
) -> ApiResult<Response> {
    let access = resolve(&state, &user, &org).await?;
    let options: NodePoolOptions = parse_body(&body)?;
    if options.name.is_some() {
        return Err(ApiError::validation("node pool name is immutable"));
    }
    access.permit(Operation::UpdateNodePool)?;
    let changes = validate_node_pool(&options, NodePoolIntent::Update, state.settings.max_replicas)?;
    let cluster = load_cluster(&state, access.namespace()?, &cluster).await?;
    let mut pool = load_node_pool(&state, &cluster, &name).await?;
    apply_node_pool_changes(&mut pool.spec, &changes);
    let pool = state.client.update(&pool).await?;
    Ok(accepted(node_pool_view(&cluster, &pool, None)))
}

/// `DELETE /v1/orgs/{org}/clusters/{cluster}/node-pools/{name}`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for readers and outsiders and
/// [`ApiError::NotFound`] when the pool is absent or owned by another
/// cluster.
pub async fn delete_node_pool(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, cluster, name)): Path<(String, String, String)>,
) -> ApiResult<Response> {
    let access = authorize(&state, &user, &org, Operation::DeleteNodePool).await?;
    let namespace = access.namespace()?;
    let cluster = load_cluster(&state, namespace, &cluster).await?;
    let pool = load_node_pool(&state, &cluster, &name).await?;
    state.client.delete::<NodePoolSpec>(Some(namespace), pool.name()).await?;
    Ok(accepted_empty())
}

// ============================================================================
// SECTION: Shared
// ============================================================================

/// Builds a node pool owned by `cluster` under its stored name.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the requested or stored name is not
/// a DNS label.
pub(crate) fn new_node_pool(cluster: &Cluster, requested: &str, spec: NodePoolSpec) -> Result<NodePool, ApiError> {
    validate_name("name", requested)?;
    let stored = stored_node_pool_name(cluster.name(), requested);
    if !is_dns_label(&stored) {
        return Err(ApiError::validation(format!("node pool name {stored} is too long")));
    }
    let namespace =
        cluster.namespace().ok_or_else(|| ApiError::Internal(format!("cluster {} has no namespace", cluster.name())))?;
    let metadata = ObjectMeta::namespaced(namespace, stored)
        .with_owner(cluster.owner_reference())
        .with_label(LABEL_CLUSTER_NAME, cluster.name())
        .with_finalizer(FINALIZER_DOCKYARDS);
    Ok(NodePool::new(metadata, spec))
}

/// Loads a cluster by name.
pub(crate) async fn load_cluster(state: &ApiState, namespace: &str, name: &str) -> Result<Cluster, ApiError> {
    state
        .client
        .get::<ClusterSpec>(Some(namespace), name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("cluster {name}")))
}

/// Lists the pools of a cluster.
pub(crate) async fn pools_of(state: &ApiState, cluster: &Cluster) -> Result<Vec<NodePool>, ApiError> {
    let namespace = cluster.namespace().unwrap_or_default();
    let params = ListParams::in_namespace(namespace).with_label(LABEL_CLUSTER_NAME, cluster.name());
    Ok(state.client.list::<NodePoolSpec>(&params).await?)
}

/// Loads a pool by its requested name.
///
/// Stored names are `<cluster>-<name>`, so `c`/`a-b` and `c-a`/`b` collide;
/// a pool belongs to `cluster` only when its label and owner both match.
async fn load_node_pool(state: &ApiState, cluster: &Cluster, requested: &str) -> Result<NodePool, ApiError> {
    let stored = stored_node_pool_name(cluster.name(), requested);
    let pool = state.client.get::<NodePoolSpec>(cluster.namespace(), &stored).await?;
    match pool {
        Some(pool) if belongs_to(&pool, cluster) => Ok(pool),
        _ => Err(ApiError::NotFound(format!("node pool {requested}"))),
    }
}

/// Returns true when `pool` is labelled with and owned by `cluster`.
fn belongs_to(pool: &NodePool, cluster: &Cluster) -> bool {
    pool.metadata.label(LABEL_CLUSTER_NAME) == Some(cluster.name()) && pool.metadata.is_owned_by(cluster.uid())
}
