//! Session handlers.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};

use crate::web::dto::TokenResponse;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{basic_credentials, TokenUser};

/// GET /connect - Exchange Basic credentials for a session token.
#[utoipa::path(
    get,
    path = "/connect",
    tag = "session",
    responses(
        (status = 200, description = "Session created", body = TokenResponse),
        (status = 401, description = "Missing or invalid credentials")
    ),
    security(
        ("basic_auth" = [])
    )
)]
pub async fn connect(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let credentials = basic_credentials(&headers).ok_or_else(ApiError::unauthorized)?;
    let token = state.sessions.authenticate(credentials).await?;
    Ok(Json(TokenResponse { token }))
}

/// GET /disconnect - Revoke the presented session token.
#[utoipa::path(
    get,
    path = "/disconnect",
    tag = "session",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn disconnect(
    State(state): State<Arc<AppState>>,
    user: TokenUser,
) -> Result<StatusCode, ApiError> {
    state.sessions.revoke(&user.token).await?;
    tracing::info!(user_id = user.user_id, "Session closed");
    Ok(StatusCode::NO_CONTENT)
}
