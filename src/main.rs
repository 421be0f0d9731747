//! TTL Cache - an in-process key-value cache with per-entry expiration
//!
//! Serves the cache over HTTP and runs the background sweep.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::api::serve;
use ttl_cache::{AppState, CleanupScheduler, Config};

/// Main entry point for the cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the substrate and cache store
/// 4. Start the background sweep (if enabled)
/// 5. Serve the HTTP API on the configured port
/// 6. On SIGINT/SIGTERM, cancel in-flight actions, drain the server and
///    dispose the scheduler
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TTL cache service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={:?}, cleanup_enabled={}, cleanup_interval={:?}, prefix={:?}, port={}, storage={:?}",
        config.cache.default_expiration,
        config.cache.automatic_cleanup_enabled,
        config.cache.cleanup_interval,
        config.cache.key_prefix,
        config.server_port,
        config.storage_path,
    );

    let state = AppState::from_config(&config);
    let mut scheduler =
        CleanupScheduler::start(state.cache.clone()).context("failed to start cleanup task")?;
    info!("Cleanup scheduler is {:?}", scheduler.state());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    let served = serve(listener, state, shutdown_signal()).await;
    scheduler.dispose().await;
    served.context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
