//! Web API Session Tests
//!
//! Integration tests for token exchange, revocation and /users/me.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use common::{basic_header, spawn_app, token_header, PASSWORD};
use serde_json::Value;

#[tokio::test]
async fn test_connect_returns_token() {
    let app = spawn_app().await;
    app.create_user("bob@dylan.com").await;

    let (name, value) = basic_header("bob@dylan.com", PASSWORD);
    let response = app.server.get("/connect").add_header(name, value).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_connect_wrong_password() {
    let app = spawn_app().await;
    app.create_user("bob@dylan.com").await;

    let (name, value) = basic_header("bob@dylan.com", "wrong-password");
    let response = app.server.get("/connect").add_header(name, value).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_connect_unknown_user() {
    let app = spawn_app().await;

    let (name, value) = basic_header("nobody@example.com", PASSWORD);
    let response = app.server.get("/connect").add_header(name, value).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_connect_without_credentials() {
    let app = spawn_app().await;

    let response = app.server.get("/connect").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // base64 of "no-colon-here"
    let response = app
        .server
        .get("/connect")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Basic bm8tY29sb24taGVyZQ=="))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disconnect_revokes_token() {
    let app = spawn_app().await;
    let (_, token) = app.user_with_token("bob@dylan.com").await;

    app.get_as(&token, "/users/me").await.assert_status_ok();

    let response = app.get_as(&token, "/disconnect").await;
    response.assert_status(StatusCode::NO_CONTENT);

    app.get_as(&token, "/users/me")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.get_as(&token, "/files")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.get_as(&token, "/disconnect")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disconnect_without_token() {
    let app = spawn_app().await;
    app.server
        .get("/disconnect")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let app = spawn_app().await;
    app.create_user("bob@dylan.com").await;
    let first = app.login("bob@dylan.com").await;
    let second = app.login("bob@dylan.com").await;
    assert_ne!(first, second);

    app.get_as(&first, "/disconnect")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.get_as(&second, "/users/me").await.assert_status_ok();
}

#[tokio::test]
async fn test_users_me() {
    let app = spawn_app().await;
    let (id, token) = app.user_with_token("bob@dylan.com").await;

    let response = app.get_as(&token, "/users/me").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], id);
    assert_eq!(body["email"], "bob@dylan.com");
}

#[tokio::test]
async fn test_bogus_token_is_unauthorized() {
    let app = spawn_app().await;
    let (name, value) = token_header("00000000-0000-0000-0000-000000000000");
    app.server
        .get("/users/me")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
