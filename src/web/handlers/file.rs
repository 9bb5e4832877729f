//! File handlers for Web API.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::web::dto::{ContentQuery, ListQuery, NodeResponse, UploadBody};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{OptionalTokenUser, TokenUser};

/// A path ID that is not a number names no node.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found())
}

/// POST /files - Create a folder, file or image.
#[utoipa::path(
    post,
    path = "/files",
    tag = "files",
    request_body = UploadBody,
    responses(
        (status = 201, description = "Node created", body = NodeResponse),
        (status = 400, description = "Invalid name, type, data or parent"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    user: TokenUser,
    body: Result<Json<UploadBody>, JsonRejection>,
) -> Result<(StatusCode, Json<NodeResponse>), ApiError> {
    let Json(body) = body?;
    let node = state
        .files
        .upload(user.user_id, body.into_request())
        .await?;

    Ok((StatusCode::CREATED, Json(NodeResponse::from(node))))
}

/// GET /files/:id - Get an owned node.
#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "Node ID")
    ),
    responses(
        (status = 200, description = "Node", body = NodeResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Node not found")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    user: TokenUser,
    Path(node_id): Path<String>,
) -> Result<Json<NodeResponse>, ApiError> {
    let node = state.files.get(parse_id(&node_id)?, user.user_id).await?;
    Ok(Json(NodeResponse::from(node)))
}

/// GET /files - List owned nodes under a parent, 20 per page.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of nodes", body = Vec<NodeResponse>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    user: TokenUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<NodeResponse>>, ApiError> {
    let Some(parent) = query.parent() else {
        return Ok(Json(Vec::new()));
    };

    let nodes = state
        .files
        .list(user.user_id, parent, query.page())
        .await?;

    Ok(Json(nodes.into_iter().map(NodeResponse::from).collect()))
}

/// PUT /files/:id/publish - Make a node public.
#[utoipa::path(
    put,
    path = "/files/{id}/publish",
    tag = "files",
    params(
        ("id" = i64, Path, description = "Node ID")
    ),
    responses(
        (status = 200, description = "Updated node", body = NodeResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Node not found")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn publish_file(
    State(state): State<Arc<AppState>>,
    user: TokenUser,
    Path(node_id): Path<String>,
) -> Result<Json<NodeResponse>, ApiError> {
    let node = state.files.publish(parse_id(&node_id)?, user.user_id).await?;
    Ok(Json(NodeResponse::from(node)))
}

/// PUT /files/:id/unpublish - Make a node private.
#[utoipa::path(
    put,
    path = "/files/{id}/unpublish",
    tag = "files",
    params(
        ("id" = i64, Path, description = "Node ID")
    ),
    responses(
        (status = 200, description = "Updated node", body = NodeResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Node not found")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn unpublish_file(
    State(state): State<Arc<AppState>>,
    user: TokenUser,
    Path(node_id): Path<String>,
) -> Result<Json<NodeResponse>, ApiError> {
    let node = state.files.unpublish(parse_id(&node_id)?, user.user_id).await?;
    Ok(Json(NodeResponse::from(node)))
}

/// GET /files/:id/data - Download content or a thumbnail.
///
/// Public nodes need no token; private ones only answer their owner.
#[utoipa::path(
    get,
    path = "/files/{id}/data",
    tag = "files",
    params(
        ("id" = i64, Path, description = "Node ID"),
        ContentQuery
    ),
    responses(
        (status = 200, description = "Content bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Node is a folder"),
        (status = 404, description = "Node or variant not found")
    ),
    security(
        (),
        ("token" = [])
    )
)]
pub async fn file_data(
    State(state): State<Arc<AppState>>,
    OptionalTokenUser(requester): OptionalTokenUser,
    Path(node_id): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<Response, ApiError> {
    let content = state
        .files
        .content(parse_id(&node_id)?, requester, query.size.as_deref())
        .await?;

    Ok(([(header::CONTENT_TYPE, content.mime_type)], content.bytes).into_response())
}
