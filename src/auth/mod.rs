//! Authentication module for filevault.
//!
//! This module provides:
//! - Argon2id password digests
//! - Credential decoding and cache-backed session tokens

mod password;
mod session;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use session::{
    session_key, Credentials, SessionManager, DEFAULT_SESSION_TTL_SECS, SESSION_KEY_PREFIX,
};
