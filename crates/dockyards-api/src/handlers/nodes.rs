// crates/dockyards-api/src/handlers/nodes.rs
// ============================================================================
// Module: Node Handlers
// Description: Lists the nodes of a cluster.
// Purpose: Read-only node projection.
// Dependencies: axum, dockyards-core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Extension;
use axum::Json;
use axum::extract::Path;
use axum::extract::State;
use dockyards_core::LABEL_CLUSTER_NAME;
use dockyards_core::ListParams;
use dockyards_core::NodeSpec;

use super::ApiResult;
use super::node_pools::load_cluster;
use crate::auth::AuthenticatedUser;
use crate::membership::authorize;
use crate::policy::Operation;
use crate::projection::node_view;
use crate::projection::sort_nodes;
use crate::state::ApiState;
use crate::types::NodeView;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /v1/orgs/{org}/clusters/{cluster}/nodes`, oldest first.
///
/// # Errors
///
/// Returns [`crate::error::ApiError::Unauthorized`] for non-members and
/// [`crate::error::ApiError::NotFound`] when the cluster is absent.
pub async fn list_nodes(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((org, cluster)): Path<(String, String)>,
) -> ApiResult<Json<Vec<NodeView>>> {
    let access = authorize(&state, &user, &org, Operation::ListNodes).await?;
    let namespace = access.namespace()?;
    let cluster = load_cluster(&state, namespace, &cluster).await?;
    let params = ListParams::in_namespace(namespace).with_label(LABEL_CLUSTER_NAME, cluster.name());
    let mut nodes = state.client.list::<NodeSpec>(&params).await?;
    sort_nodes(&mut nodes);
    Ok(Json(nodes.iter().map(node_view).collect()))
}
