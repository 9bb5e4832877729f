//! Error types for filevault.

use thiserror::Error;

/// Common error type for filevault.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Document store error.
    ///
    /// Errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// Session cache error.
    #[error("cache error: {0}")]
    Cache(String),

    /// Work queue error.
    #[error("queue error: {0}")]
    Queue(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid token, missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Invalid user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested parent node does not exist.
    #[error("parent not found")]
    ParentNotFound,

    /// The requested parent node exists but is not a folder.
    #[error("parent is not a folder")]
    ParentNotFolder,

    /// Resource not found.
    ///
    /// Also used for resources owned by someone else and for private
    /// content requested by a non-owner.
    #[error("{0} not found")]
    NotFound(String),

    /// The operation does not apply to this kind of resource.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected failure inside the process (e.g. a panicked task).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for VaultError {
    fn from(e: sqlx::Error) -> Self {
        VaultError::Database(e.to_string())
    }
}

/// Result type alias for filevault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
