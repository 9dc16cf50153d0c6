//! Simple Cache host process
//!
//! Runs a standalone cache instance holding JSON values, logging reclaimer
//! activity until interrupted. Useful for observing sweep behavior and
//! checking a configuration before embedding the library.

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use simple_cache::{CacheStore, Config};

/// Main entry point for the cache host.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create cache store and start the background reclaimer
/// 4. Wait for SIGINT/SIGTERM
/// 5. Stop the reclaimer and report final statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simple_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Simple Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_memory={}, reclaim_interval={}s",
        config.max_memory, config.reclaim_interval_secs
    );

    let (cache, reclaimer) = CacheStore::<serde_json::Value>::from_config(&config)
        .context("failed to build cache from configuration")?;
    info!("Cache store initialized with {} byte budget", cache.max_memory());

    shutdown_signal().await?;

    reclaimer.stop().await;

    let stats = serde_json::to_string(&cache.stats()).context("failed to encode stats")?;
    info!("Final statistics: {}", stats);
    info!("Shutdown complete");

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("failed to listen for Ctrl+C") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<(), anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<anyhow::Result<()>>();

    tokio::select! {
        result = ctrl_c => {
            result?;
            info!("Received Ctrl+C, initiating shutdown...");
        }
        result = terminate => {
            result?;
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    Ok(())
}
