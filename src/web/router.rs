//! Router configuration for Web API.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use super::dto::{
    MeResponse, NodeResponse, StatsResponse, StatusResponse, TokenResponse, UploadBody,
};
use super::handlers::{self, AppState};
use super::middleware::{create_cors_layer, TOKEN_HEADER};
use crate::config::{FilesConfig, ServerConfig};

/// OpenAPI document for the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::status,
        handlers::stats,
        handlers::connect,
        handlers::disconnect,
        handlers::me,
        handlers::upload_file,
        handlers::get_file,
        handlers::list_files,
        handlers::publish_file,
        handlers::unpublish_file,
        handlers::file_data
    ),
    components(schemas(
        UploadBody,
        NodeResponse,
        TokenResponse,
        StatusResponse,
        StatsResponse,
        MeResponse
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "session", description = "Token sessions"),
        (name = "files", description = "Folder hierarchy and content"),
        (name = "users", description = "Users"),
        (name = "status", description = "Health and statistics")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(TOKEN_HEADER))),
            );
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}

/// Largest accepted request body.
///
/// Uploads arrive base64-encoded inside JSON, so the limit leaves room for
/// the 4/3 expansion plus the surrounding fields.
pub fn body_limit(files: &FilesConfig) -> usize {
    let raw = files.max_upload_size_mb.saturating_mul(1024 * 1024);
    usize::try_from(raw / 3 * 4 + 64 * 1024).unwrap_or(usize::MAX)
}

/// Create the main API router.
pub fn create_router(state: Arc<AppState>, server: &ServerConfig, files: &FilesConfig) -> Router {
    let file_routes = Router::new()
        .route("/", get(handlers::list_files).post(handlers::upload_file))
        .route("/:id", get(handlers::get_file))
        .route("/:id/publish", put(handlers::publish_file))
        .route("/:id/unpublish", put(handlers::unpublish_file))
        .route("/:id/data", get(handlers::file_data));

    Router::new()
        .route("/status", get(handlers::status))
        .route("/stats", get(handlers::stats))
        .route("/connect", get(handlers::connect))
        .route("/disconnect", get(handlers::disconnect))
        .route("/users/me", get(handlers::me))
        .nest("/files", file_routes)
        .layer(DefaultBodyLimit::max(body_limit(files)))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&server.cors_origins))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    server.request_timeout_secs,
                ))),
        )
        .with_state(state)
}

/// Create the Swagger UI router.
pub fn create_swagger_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_limit_allows_base64_overhead() {
        let files = FilesConfig {
            max_upload_size_mb: 3,
            ..Default::default()
        };
        assert!(body_limit(&files) > 4 * 1024 * 1024);
    }

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/status",
            "/stats",
            "/connect",
            "/disconnect",
            "/users/me",
            "/files",
            "/files/{id}",
            "/files/{id}/publish",
            "/files/{id}/unpublish",
            "/files/{id}/data",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_create_swagger_router() {
        let _router = create_swagger_router();
    }
}
