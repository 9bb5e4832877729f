//! User handlers.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::web::dto::MeResponse;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::TokenUser;

/// GET /users/me - The user behind the session token.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("token" = [])
    )
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    user: TokenUser,
) -> Result<Json<MeResponse>, ApiError> {
    // a session can outlive its user only if the user row was removed by hand
    let record = state
        .users
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    Ok(Json(MeResponse::from(record)))
}
