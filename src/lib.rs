//! filevault - per-user hierarchical file storage
//!
//! Users exchange credentials for short-lived bearer tokens, then create
//! folders, files and images in their own tree, publish them, and read
//! content back. Image uploads are handed to an external thumbnail worker.

pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{hash_password, verify_password, Credentials, PasswordError, SessionManager};
pub use cache::{CacheStore, MemoryCache, SqlCache};
pub use config::Config;
pub use db::{Database, NewUser, NodeStore, User, UserRepository, UserStore};
pub use error::{Result, VaultError};
pub use file::{
    BlobStore, FileHierarchy, FileNode, FileService, JobQueue, NodeType, ParentRef, SqlJobQueue,
    ThumbnailJob,
};
