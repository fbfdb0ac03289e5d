use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use watchroom_api::{
    config::{Config, StorageBackend},
    db::{create_pool, create_redis_client, run_migrations, Cache, MemoryStore, PgStore, Store},
    routes::{create_router, AppState},
    services::providers::TmdbProvider,
};

/// Setup logging, honouring `RUST_LOG` when set
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("watchroom_api=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    setup_logging();

    let store: Arc<dyn Store> = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.database_max_connections).await?;
            run_migrations(&pool).await?;
            tracing::info!("Connected to PostgreSQL");
            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let (cache, cache_handle) = match &config.redis_url {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?);
            tracing::info!("Catalog responses cached in Redis");
            (Some(cache), Some(handle))
        }
        None => (None, None),
    };

    if config.tmdb_api_key.is_empty() {
        tracing::warn!("TMDB_API_KEY is not set; catalog lookups will fail");
    }
    let catalog = Arc::new(TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_base.clone(),
        cache,
    ));

    let state = AppState::new(store, catalog)
        .with_session_ttl_days(config.session_ttl_days)
        .with_bcrypt_cost(config.bcrypt_cost);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }
    tracing::info!("Server stopped");
    Ok(())
}
