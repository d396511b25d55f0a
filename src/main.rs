//! Weather Cache - cache-aside weather query service

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weather_cache::cache::{CacheBackend, DisabledCache, MemoryCache};
use weather_cache::history::{HistoryStore, MemoryHistoryStore, SqliteHistoryStore};
use weather_cache::weather::OpenWeatherClient;
use weather_cache::{create_router, spawn_expiry_task, AppState, Config};

/// Main entry point for the weather cache server.
///
/// # Startup Sequence
/// 1. Load `.env` and initialize the tracing subscriber
/// 2. Load configuration from environment variables
/// 3. Build the provider client, the cache and the history store
/// 4. Start the background expiry sweep when caching is enabled
/// 5. Serve the tool API until SIGINT/SIGTERM, then release resources
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Weather Cache Server");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        cache_enabled = config.cache_enabled,
        cache_max_entries = config.cache_max_entries,
        weather_ttl = config.weather_cache_ttl,
        forecast_ttl = config.forecast_cache_ttl,
        "configuration loaded"
    );
    if config.weather_api_key.is_none() {
        warn!("WEATHER_API_KEY is not set, provider calls will fail");
    }

    let provider =
        Arc::new(OpenWeatherClient::from_config(&config).context("failed to build weather API client")?);

    let (cache, expiry_handle): (Arc<dyn CacheBackend>, Option<JoinHandle<()>>) = if config.cache_enabled {
        let memory = MemoryCache::new(config.cache_max_entries, config.weather_cache_ttl);
        let handle = spawn_expiry_task(memory.clone(), config.cache_cleanup_interval);
        (Arc::new(memory) as Arc<dyn CacheBackend>, Some(handle))
    } else {
        warn!("caching disabled, every query goes to the provider");
        (Arc::new(DisabledCache) as Arc<dyn CacheBackend>, None)
    };

    let (history, database): (Arc<dyn HistoryStore>, Option<SqliteHistoryStore>) =
        match config.database_url.as_deref() {
            Some(url) => {
                let store = SqliteHistoryStore::connect(url)
                    .await
                    .with_context(|| format!("failed to open history database {url}"))?;
                (Arc::new(store.clone()) as Arc<dyn HistoryStore>, Some(store))
            }
            None => {
                info!("DATABASE_URL not set, weather history kept in memory");
                (Arc::new(MemoryHistoryStore::new()) as Arc<dyn HistoryStore>, None)
            }
        };

    let state = AppState::from_parts(&config, cache, provider, history);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(handle) = expiry_handle {
        handle.abort();
        info!("expiry sweep stopped");
    }
    if let Some(database) = database {
        database.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
