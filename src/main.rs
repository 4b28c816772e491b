//! Herd Cache host process
//!
//! Builds the per-concern caches, runs the periodic expiry sweep and serves
//! the admin API.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use herd_cache::api::create_router;
use herd_cache::{spawn_cleanup_task, AppState, Config, HerdCaches};

/// Main entry point for the cache host.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create one cache per concern
/// 4. Start background expiry sweep
/// 5. Create Axum router with the admin endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "herd_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Herd Cache");

    let config = Config::from_env().context("invalid cache configuration")?;
    info!(
        "Configuration loaded: port={}, cleanup_interval={}s, search={}/{:?}, statistics={}/{:?}, images={}/{:?}",
        config.server_port,
        config.cleanup_interval,
        config.search.max_size(),
        config.search.default_ttl(),
        config.statistics.max_size(),
        config.statistics.default_ttl(),
        config.images.max_size(),
        config.images.default_ttl(),
    );

    // Services receive these handles; the admin API and sweep share them
    let caches = HerdCaches::from_config(&config);
    let state = AppState::from_caches(&caches);
    info!("Caches initialized");

    let cleanup_handle = spawn_cleanup_task(
        caches.registry(),
        Duration::from_secs(config.cleanup_interval.max(1)),
    );
    info!("Background expiry sweep started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Admin API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("admin server failed")?;

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
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

    cleanup_handle.abort();
    warn!("Expiry sweep aborted");
}
