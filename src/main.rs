use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use proxyscope::api;
use proxyscope::config::{Config, DatabaseBackend};
use proxyscope::service::ProxyService;
use proxyscope::storage::{PostgresStorage, ProxyStorage, SqliteStorage};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let storage: Arc<dyn ProxyStorage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.database.url);
            Arc::new(
                SqliteStorage::new(
                    &config.database.url,
                    config.database.max_connections,
                    config.database.max_lifetime_secs,
                )
                .await?,
            )
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage: {}", config.database.url);
            Arc::new(
                PostgresStorage::new(
                    &config.database.url,
                    config.database.max_connections,
                    config.database.max_lifetime_secs,
                )
                .await?,
            )
        }
    };

    // The range table normally pre-exists; init creates it for fresh
    // dev databases.
    storage.init().await?;
    info!("Database ready");

    let service = ProxyService::new(storage, config.limits.range_fetch_limit);
    let app = api::create_api_router(service);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 API server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
