//! Test helpers for the HTTP API tests.
//!
//! Builds the full router over an in-memory database, an in-process
//! session cache and a channel-backed thumbnail queue.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestResponse, TestServer};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

use filevault::cache::MemoryCache;
use filevault::config::{FilesConfig, ServerConfig};
use filevault::db::{NewUser, UserRepository, UserStore};
use filevault::file::{BlobStore, ChannelQueue, ThumbnailJob};
use filevault::web::{create_router, AppState};
use filevault::Database;

/// Password used for every test user.
pub const PASSWORD: &str = "toto1234!";

/// A running application with handles to its backing stores.
pub struct TestApp {
    /// HTTP test client.
    pub server: TestServer,
    /// Document store.
    pub db: Database,
    /// Thumbnail jobs emitted by image uploads.
    pub jobs: UnboundedReceiver<ThumbnailJob>,
    _storage: TempDir,
}

/// Create a test server with empty stores.
pub async fn spawn_app() -> TestApp {
    let storage = TempDir::new().expect("Failed to create storage dir");
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let (queue, jobs) = ChannelQueue::new();

    let state = AppState::new(
        db.clone(),
        Arc::new(MemoryCache::new()),
        BlobStore::new(storage.path()).expect("Failed to create blob store"),
        Arc::new(queue),
    );

    let router = create_router(
        Arc::new(state),
        &ServerConfig::default(),
        &FilesConfig::default(),
    );
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        jobs,
        _storage: storage,
    }
}

/// `X-Token` header for a session token.
pub fn token_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-token"),
        HeaderValue::from_str(token).expect("token is a valid header value"),
    )
}

/// Basic `Authorization` header for an email and password.
pub fn basic_header(email: &str, password: &str) -> (HeaderName, HeaderValue) {
    let encoded = STANDARD.encode(format!("{email}:{password}"));
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Basic {encoded}")).expect("valid header value"),
    )
}

/// Base64 encoding of a payload, as sent in upload bodies.
pub fn b64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

impl TestApp {
    /// Insert a user directly into the document store.
    pub async fn create_user(&self, email: &str) -> i64 {
        let users = UserRepository::new(self.db.pool());
        let new_user = NewUser::with_password(email, PASSWORD).expect("Failed to hash password");
        users
            .insert(&new_user)
            .await
            .expect("Failed to create user")
            .id
    }

    /// Log in and return the session token.
    pub async fn login(&self, email: &str) -> String {
        let (name, value) = basic_header(email, PASSWORD);
        let response = self.server.get("/connect").add_header(name, value).await;
        response.assert_status_ok();
        response.json::<Value>()["token"]
            .as_str()
            .expect("token in response")
            .to_string()
    }

    /// Create a user and log in as them.
    pub async fn user_with_token(&self, email: &str) -> (i64, String) {
        let id = self.create_user(email).await;
        let token = self.login(email).await;
        (id, token)
    }

    /// POST /files as the given user.
    pub async fn upload(&self, token: &str, body: &Value) -> TestResponse {
        let (name, value) = token_header(token);
        self.server
            .post("/files")
            .add_header(name, value)
            .json(body)
            .await
    }

    /// GET a path as the given user.
    pub async fn get_as(&self, token: &str, path: &str) -> TestResponse {
        let (name, value) = token_header(token);
        self.server.get(path).add_header(name, value).await
    }

    /// PUT a path as the given user.
    pub async fn put_as(&self, token: &str, path: &str) -> TestResponse {
        let (name, value) = token_header(token);
        self.server.put(path).add_header(name, value).await
    }
}
