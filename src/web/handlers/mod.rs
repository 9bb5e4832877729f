//! API handlers for filevault.

pub mod auth;
pub mod file;
pub mod status;
pub mod user;

pub use auth::*;
pub use file::*;
pub use status::*;
pub use user::*;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::SessionManager;
use crate::cache::CacheStore;
use crate::db::{UserRepository, UserStore};
use crate::file::{
    BlobStore, FileHierarchy, FileService, JobQueue, NodeRepository, ThumbnailDispatcher,
};
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document store.
    pub db: Database,
    /// Session cache.
    pub cache: Arc<dyn CacheStore>,
    /// User lookups.
    pub users: Arc<dyn UserStore>,
    /// Session tokens.
    pub sessions: SessionManager,
    /// File hierarchy operations.
    pub files: FileService,
}

impl AppState {
    /// Wire the stores together.
    pub fn new(
        db: Database,
        cache: Arc<dyn CacheStore>,
        blobs: BlobStore,
        queue: Arc<dyn JobQueue>,
    ) -> Self {
        let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool()));
        let hierarchy = FileHierarchy::new(
            Arc::new(NodeRepository::new(db.pool())),
            blobs,
            ThumbnailDispatcher::new(queue),
        );

        Self {
            sessions: SessionManager::new(Arc::clone(&cache), Arc::clone(&users)),
            files: FileService::new(hierarchy),
            db,
            cache,
            users,
        }
    }

    /// Override the session lifetime.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.sessions = self.sessions.with_ttl(ttl);
        self
    }
}
