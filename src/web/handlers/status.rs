//! Health and statistics handlers.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::web::dto::{StatsResponse, StatusResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /status - Reachability of the cache and the document store.
#[utoipa::path(
    get,
    path = "/status",
    tag = "status",
    responses(
        (status = 200, description = "Backend status", body = StatusResponse)
    )
)]
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (redis, db) = tokio::join!(state.cache.is_alive(), state.db.is_alive());
    Json(StatusResponse { redis, db })
}

/// GET /stats - Number of users and nodes.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "status",
    responses(
        (status = 200, description = "Record counts", body = StatsResponse),
        (status = 500, description = "Document store unavailable")
    )
)]
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, ApiError> {
    let users = state.users.count().await?;
    let files = state.files.count().await?;
    Ok(Json(StatsResponse { users, files }))
}
