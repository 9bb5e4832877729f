use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use filevault::file::{BlobStore, SqlJobQueue};
use filevault::web::{AppState, WebServer};
use filevault::{cache, Config, Database};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = filevault::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        filevault::logging::init_console_only(&config.logging.level);
    }

    info!("filevault - hierarchical file storage");

    if let Err(e) = run(config).await {
        error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> filevault::Result<()> {
    config.validate()?;

    let db = Database::connect(&config.database).await?;
    let cache = cache::open(&config.cache).await?;
    let blobs = BlobStore::new(&config.files.storage_path)?;
    info!("File storage initialized at: {}", config.files.storage_path);

    let queue = Arc::new(SqlJobQueue::new(db.pool()));
    let state = AppState::new(db.clone(), Arc::clone(&cache), blobs, queue)
        .with_session_ttl(Duration::from_secs(config.cache.session_ttl_secs));

    let server = WebServer::new(&config.server, &config.files, state)?;
    info!("Server configured on {}", server.addr());

    let result = server.run().await;

    cache.close().await;
    db.close().await;
    result
}
