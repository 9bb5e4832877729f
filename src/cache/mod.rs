//! Key-value cache store for filevault.
//!
//! Sessions live only here. The core sees the cache through [`CacheStore`]
//! and never keeps session state of its own.

mod memory;
mod sqlite;

pub use memory::MemoryCache;
pub use sqlite::SqlCache;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::CacheConfig;
use crate::{Result, VaultError};

/// A string-to-string cache with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a live entry. Expired entries are reported as absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set an entry that expires after `ttl`, replacing any previous value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Delete an entry. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check that the cache is reachable.
    async fn is_alive(&self) -> bool;

    /// Drop expired entries, returning how many were removed.
    ///
    /// Backends that evict on their own report zero.
    async fn purge_expired(&self) -> Result<u64> {
        Ok(0)
    }

    /// Release the backend connection.
    async fn close(&self) {}
}

/// Open the cache backend named in the configuration.
pub async fn open(config: &CacheConfig) -> Result<Arc<dyn CacheStore>> {
    match config.backend.as_str() {
        "sqlite" => Ok(Arc::new(SqlCache::open(&config.path).await?)),
        "memory" => Ok(Arc::new(MemoryCache::new())),
        other => Err(VaultError::Config(format!("unknown cache backend '{other}'"))),
    }
}
