//! User model for filevault.
//!
//! Accounts are created outside the core; the core only reads them.

use crate::auth::{hash_password, PasswordError};

/// A registered user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// One-way password digest (Argon2id PHC string).
    pub password_digest: String,
}

/// Data for inserting a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login email.
    pub email: String,
    /// Password digest, already hashed.
    pub password_digest: String,
}

impl NewUser {
    /// Create a NewUser from an already computed digest.
    pub fn new(email: impl Into<String>, password_digest: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_digest: password_digest.into(),
        }
    }

    /// Create a NewUser by hashing a plain password.
    pub fn with_password(email: impl Into<String>, password: &str) -> Result<Self, PasswordError> {
        Ok(Self::new(email, hash_password(password)?))
    }
}
