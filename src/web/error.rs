//! API error handling for filevault.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::VaultError;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or invalid token or credentials (401).
    Unauthorized,
    /// Missing or invalid input (400).
    ValidationError,
    /// Parent folder does not exist (400).
    ParentNotFound,
    /// Parent exists but is not a folder (400).
    ParentNotFolder,
    /// Resource missing, foreign or hidden (404).
    NotFound,
    /// Operation does not apply to the resource (400).
    UnsupportedOperation,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::ValidationError
            | ErrorCode::ParentNotFound
            | ErrorCode::ParentNotFolder
            | ErrorCode::UnsupportedOperation => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create an unauthorized error.
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized, "Unauthorized")
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Create a not found error.
    pub fn not_found() -> Self {
        Self::new(ErrorCode::NotFound, "Not found")
    }

    /// Create an internal server error.
    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError, "An internal error occurred")
    }

    /// Error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::Unauthorized => ApiError::unauthorized(),
            VaultError::Validation(msg) => ApiError::validation(msg),
            VaultError::ParentNotFound => {
                ApiError::new(ErrorCode::ParentNotFound, "Parent not found")
            }
            VaultError::ParentNotFolder => {
                ApiError::new(ErrorCode::ParentNotFolder, "Parent is not a folder")
            }
            VaultError::NotFound(_) => ApiError::not_found(),
            VaultError::UnsupportedOperation(msg) => {
                ApiError::new(ErrorCode::UnsupportedOperation, msg)
            }
            other => {
                tracing::error!("Internal error: {}", other);
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::validation("Invalid request body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status() {
        assert_eq!(
            ErrorCode::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::ValidationError.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ParentNotFound.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ParentNotFolder.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::UnsupportedOperation.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_vault_error() {
        let err = ApiError::from(VaultError::Validation("Missing name".to_string()));
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.message(), "Missing name");

        let err = ApiError::from(VaultError::ParentNotFound);
        assert_eq!(err.code(), ErrorCode::ParentNotFound);
        assert_eq!(err.message(), "Parent not found");

        let err = ApiError::from(VaultError::ParentNotFolder);
        assert_eq!(err.message(), "Parent is not a folder");

        // the resource name never reaches the client
        let err = ApiError::from(VaultError::NotFound("node".to_string()));
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Not found");

        let err = ApiError::from(VaultError::Unauthorized);
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn test_internal_errors_are_masked() {
        let err = ApiError::from(VaultError::Database("disk I/O error at /secret".to_string()));
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.message().contains("/secret"));
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::ParentNotFolder).unwrap();
        assert_eq!(json, "\"PARENT_NOT_FOLDER\"");
    }
}
