//! Expiry Reclaimer Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Shortest period the reclaimer will sleep between sweeps.
pub const MIN_RECLAIM_INTERVAL: Duration = Duration::from_millis(1);

// == Reclaimer Handle ==
/// Owns a running reclaimer task.
///
/// Dropping the handle also stops the task: the stop channel closes and the
/// loop exits at its next wake-up.
#[derive(Debug)]
pub struct ReclaimerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ReclaimerHandle {
    /// Signals the reclaimer to stop and waits for it to exit.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // Err means the task already exited
            let _ = shutdown.send(());
        }
        let _ = self.task.await;
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a background task that periodically reclaims expired entries.
///
/// Each cycle sleeps for `interval`, runs [`CacheStore::reclaim_expired`] and
/// logs the outcome, whether or not anything was removed. The loop ends when
/// the returned handle is stopped or dropped.
///
/// # Arguments
/// * `cache` - Shared store to sweep
/// * `interval` - Period between sweeps, clamped to [`MIN_RECLAIM_INTERVAL`]
///
/// # Example
/// ```ignore
/// let cache = Arc::new(CacheStore::<String>::standalone());
/// let reclaimer = spawn_reclaimer(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// reclaimer.stop().await;
/// ```
pub fn spawn_reclaimer<V>(cache: Arc<CacheStore<V>>, interval: Duration) -> ReclaimerHandle
where
    V: Send + Sync + 'static,
{
    let interval = interval.max(MIN_RECLAIM_INTERVAL);
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        info!("Starting reclaimer with interval of {:?}", interval);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let removed = cache.reclaim_expired();

            if removed > 0 {
                info!("Reclaim: removed {} expired entries", removed);
            } else {
                debug!("Reclaim: no expired entries found");
            }
        }

        info!("Reclaimer stopped");
    });

    ReclaimerHandle {
        shutdown: Some(shutdown_tx),
        task,
    }
}
