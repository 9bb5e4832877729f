//! Web API Status Tests

mod common;

use axum::http::StatusCode;
use common::{b64, spawn_app};
use serde_json::{json, Value};

#[tokio::test]
async fn test_status_reports_backends() {
    let app = spawn_app().await;

    let response = app.server.get("/status").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({"redis": true, "db": true}));
}

#[tokio::test]
async fn test_status_after_database_close() {
    let app = spawn_app().await;
    app.db.close().await;

    let body: Value = app.server.get("/status").await.json();
    assert_eq!(body["db"], false);
    assert_eq!(body["redis"], true);
}

#[tokio::test]
async fn test_stats_counts_users_and_files() {
    let app = spawn_app().await;

    let body: Value = app.server.get("/stats").await.json();
    assert_eq!(body, json!({"users": 0, "files": 0}));

    let (_, token) = app.user_with_token("bob@dylan.com").await;
    app.upload(&token, &json!({"name": "Documents", "type": "folder"}))
        .await
        .assert_status(StatusCode::CREATED);
    app.upload(
        &token,
        &json!({"name": "a.txt", "type": "file", "data": b64(b"hi")}),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let body: Value = app.server.get("/stats").await.json();
    assert_eq!(body, json!({"users": 1, "files": 2}));
}
