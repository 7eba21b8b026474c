//! Route handlers for `/nodes`.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::dto::{
    node_list, ApiResponse, NodeCreateRequest, NodeCreatedResponse, NodeMoveRequest,
    NodeResponse, NodeUpdateRequest,
};
use crate::error::TreeError;
use crate::service::TreeService;
use crate::traits::{ClosureStore, NodeStore};

type Service<N, S> = State<Arc<TreeService<N, S>>>;
type NodeId = Result<Path<Uuid>, PathRejection>;
type Body<T> = Result<Json<T>, JsonRejection>;

/// Unwrap the body of a request addressed to node `id`. An unknown node is
/// reported before a malformed body.
async fn body_for<N, S, T>(
    service: &TreeService<N, S>,
    id: Uuid,
    body: Body<T>,
) -> Result<T, TreeError>
where
    N: NodeStore,
    S: ClosureStore,
{
    match body {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            service.ensure_exists(id).await?;
            Err(rejection.into())
        }
    }
}

/// POST /nodes
pub async fn create_node<N, S>(
    State(service): Service<N, S>,
    body: Body<NodeCreateRequest>,
) -> Result<impl IntoResponse, TreeError>
where
    N: NodeStore,
    S: ClosureStore,
{
    let Json(request) = body?;
    let created = service.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Node has been created",
            NodeCreatedResponse::from(created),
        )),
    ))
}

/// GET /nodes
pub async fn list_roots<N, S>(
    State(service): Service<N, S>,
) -> Result<impl IntoResponse, TreeError>
where
    N: NodeStore,
    S: ClosureStore,
{
    let roots = service.roots().await?;
    Ok(Json(ApiResponse::ok("List of root nodes", node_list(roots))))
}

/// GET /nodes/:id
pub async fn get_node<N, S>(
    State(service): Service<N, S>,
    id: NodeId,
) -> Result<impl IntoResponse, TreeError>
where
    N: NodeStore,
    S: ClosureStore,
{
    let Path(id) = id?;
    let node = service.get(id).await?;
    Ok(Json(ApiResponse::ok("Detail of node", NodeResponse::from(node))))
}

/// PUT /nodes/:id
pub async fn update_node<N, S>(
    State(service): Service<N, S>,
    id: NodeId,
    body: Body<NodeUpdateRequest>,
) -> Result<impl IntoResponse, TreeError>
where
    N: NodeStore,
    S: ClosureStore,
{
    let Path(id) = id?;
    let request = body_for(&service, id, body).await?;
    let node = service.update(id, request).await?;
    Ok(Json(ApiResponse::ok(
        "Node detail has been updated",
        NodeResponse::from(node),
    )))
}

/// DELETE /nodes/:id
pub async fn delete_node<N, S>(
    State(service): Service<N, S>,
    id: NodeId,
) -> Result<impl IntoResponse, TreeError>
where
    N: NodeStore,
    S: ClosureStore,
{
    let Path(id) = id?;
    service.delete(id).await?;
    Ok(Json(ApiResponse::message(
        "Node with all descendants has been deleted",
    )))
}

/// GET /nodes/:id/descendants
pub async fn list_descendants<N, S>(
    State(service): Service<N, S>,
    id: NodeId,
) -> Result<impl IntoResponse, TreeError>
where
    N: NodeStore,
    S: ClosureStore,
{
    let Path(id) = id?;
    let nodes = service.descendants(id).await?;
    Ok(Json(ApiResponse::ok(
        "List of descendant nodes",
        node_list(nodes),
    )))
}

/// POST /nodes/:id/move
pub async fn move_node<N, S>(
    State(service): Service<N, S>,
    id: NodeId,
    body: Body<NodeMoveRequest>,
) -> Result<impl IntoResponse, TreeError>
where
    N: NodeStore,
    S: ClosureStore,
{
    let Path(id) = id?;
    let request = body_for(&service, id, body).await?;
    service.move_node(id, request).await?;
    Ok(Json(ApiResponse::message("Node has been moved")))
}
