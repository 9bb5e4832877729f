//! Web server for filevault.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::cache::CacheStore;
use crate::config::{FilesConfig, ServerConfig};
use crate::{Result, VaultError};

use super::handlers::AppState;
use super::router::{create_router, create_swagger_router};

/// Cache purge interval: 1 hour.
const PURGE_INTERVAL_SECS: u64 = 3600;

/// HTTP server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Server configuration.
    server_config: ServerConfig,
    /// Upload limits.
    files_config: FilesConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(server: &ServerConfig, files: &FilesConfig, app_state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", server.host, server.port)
            .parse()
            .map_err(|e| VaultError::Config(format!("invalid listen address: {e}")))?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            server_config: server.clone(),
            files_config: files.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Full application router.
    pub fn router(&self) -> Router {
        create_router(
            Arc::clone(&self.app_state),
            &self.server_config,
            &self.files_config,
        )
        .merge(create_swagger_router())
        .layer(CompressionLayer::new())
    }

    /// Start the cache purge background task.
    ///
    /// Runs every hour and drops expired session entries.
    fn start_purge_task(cache: Arc<dyn CacheStore>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(PURGE_INTERVAL_SECS));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                match cache.purge_expired().await {
                    Ok(0) => tracing::debug!("No expired sessions to purge"),
                    Ok(count) => tracing::info!(deleted_count = count, "Purged expired sessions"),
                    Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
                }
            }
        });
    }

    async fn bind(&self) -> Result<(TcpListener, SocketAddr)> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        Self::start_purge_task(Arc::clone(&self.app_state.cache));
        tracing::info!("Web server listening on http://{}", local_addr);

        Ok((listener, local_addr))
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<()> {
        let router = self.router();
        let (listener, _) = self.bind().await?;

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.router();
        let (listener, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
