//! Session token extractors.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::VaultError;

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "x-token";

fn header_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The base64 `email:password` pair of a Basic `Authorization` header.
pub fn basic_credentials(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credentials) = value.trim().split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("basic")
        .then(|| credentials.trim())
}

/// Extractor for authenticated users.
///
/// Rejects the request with 401 unless `X-Token` names a live session.
#[derive(Debug, Clone)]
pub struct TokenUser {
    /// User the session belongs to.
    pub user_id: i64,
    /// The presented token.
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for TokenUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = header_token(&parts.headers);
        let user_id = state.sessions.validate(token).await?;

        Ok(TokenUser {
            user_id,
            token: token.unwrap_or_default().to_string(),
        })
    }
}

/// Optional authentication extractor.
///
/// Like [`TokenUser`] but a missing or stale token just means an
/// anonymous caller.
#[derive(Debug, Clone)]
pub struct OptionalTokenUser(pub Option<i64>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OptionalTokenUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = header_token(&parts.headers) else {
            return Ok(OptionalTokenUser(None));
        };

        match state.sessions.validate(Some(token)).await {
            Ok(user_id) => Ok(OptionalTokenUser(Some(user_id))),
            Err(VaultError::Unauthorized) => Ok(OptionalTokenUser(None)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(header_token(&headers), None);

        headers.insert(TOKEN_HEADER, HeaderValue::from_static(""));
        assert_eq!(header_token(&headers), None);

        headers.insert(TOKEN_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(header_token(&headers), Some("abc-123"));
    }

    #[test]
    fn test_basic_credentials() {
        let mut headers = HeaderMap::new();
        assert_eq!(basic_credentials(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic Ym9iOnB3"));
        assert_eq!(basic_credentials(&headers), Some("Ym9iOnB3"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("basic Ym9iOnB3"));
        assert_eq!(basic_credentials(&headers), Some("Ym9iOnB3"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(basic_credentials(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic"));
        assert_eq!(basic_credentials(&headers), None);
    }
}
