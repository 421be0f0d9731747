//! Cleanup Scheduler
//!
//! Background task that periodically sweeps expired entries out of the cache.
//! The task owns its own cancellation token, independent of any
//! caller-triggered cancellation, and is torn down exactly once.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

/// Lifecycle of a [`CleanupScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Automatic cleanup is disabled; no task was spawned
    Stopped,
    /// The sweep loop is running
    Running,
    /// Disposed; terminal
    Cancelled,
}

/// Handle to the periodic sweep task.
#[derive(Debug)]
pub struct CleanupScheduler {
    state: SchedulerState,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl CleanupScheduler {
    /// Starts the sweep loop if the cache's configuration enables it.
    ///
    /// Returns a `Stopped` scheduler when automatic cleanup is disabled, and
    /// `InvalidArgument` for a zero interval.
    pub fn start(cache: Arc<CacheStore>) -> Result<Self> {
        let config = cache.config();

        if !config.automatic_cleanup_enabled {
            info!("Automatic cleanup disabled");
            return Ok(Self {
                state: SchedulerState::Stopped,
                token: CancellationToken::new(),
                handle: None,
            });
        }

        if config.cleanup_interval.is_zero() {
            return Err(CacheError::InvalidArgument(
                "Cleanup interval must be greater than zero".to_string(),
            ));
        }

        let interval = config.cleanup_interval;
        let token = CancellationToken::new();
        let handle = tokio::spawn(run_sweep_loop(cache, interval, token.clone()));

        Ok(Self {
            state: SchedulerState::Running,
            token,
            handle: Some(handle),
        })
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Stops the loop and waits for it to exit.
    ///
    /// Cancellation is signalled first, so no sweep starts once this is
    /// called. Later calls are no-ops.
    pub async fn dispose(&mut self) {
        if self.state == SchedulerState::Cancelled {
            return;
        }

        self.token.cancel();

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    error!("Cleanup task panicked: {}", e);
                }
            }
            info!("Cleanup task stopped");
        }

        self.state = SchedulerState::Cancelled;
    }
}

impl Drop for CleanupScheduler {
    fn drop(&mut self) {
        // An undisposed scheduler must not leave the loop running.
        self.token.cancel();
    }
}

async fn run_sweep_loop(cache: Arc<CacheStore>, interval: Duration, token: CancellationToken) {
    info!("Starting cleanup task with interval of {:?}", interval);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("Sweep interrupted by shutdown");
                break;
            }
            result = cache.clean_expired_items() => match result {
                Ok(removed) => debug!("Scheduled sweep finished, {} removed", removed),
                Err(e) => error!("Scheduled sweep failed: {}", e),
            }
        }
    }

    debug!("Cleanup loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{encode, CacheEntry};
    use crate::config::CacheConfig;
    use crate::storage::testing::FlakyBackend;
    use crate::storage::{MemoryBackend, StorageBackend};
    use chrono::Utc;

    fn cache_with(backend: impl StorageBackend + 'static, config: CacheConfig) -> Arc<CacheStore> {
        Arc::new(CacheStore::new(Arc::new(backend), config))
    }

    fn fast_config() -> CacheConfig {
        CacheConfig::default()
            .with_automatic_cleanup(true)
            .with_cleanup_interval(Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let backend = MemoryBackend::new();
        let cache = cache_with(backend.clone(), fast_config());

        cache
            .set("expire_soon", "value", Some(Duration::from_millis(10)))
            .await
            .unwrap();

        let mut scheduler = CleanupScheduler::start(cache.clone()).unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Running);

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(backend.is_empty().await, "Expired entry should have been swept");
        scheduler.dispose().await;
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = cache_with(MemoryBackend::new(), fast_config());
        cache
            .set("long_lived", "value", Some(Duration::from_secs(3600)))
            .await
            .unwrap();

        let mut scheduler = CleanupScheduler::start(cache.clone()).unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        let value: Option<String> = cache.get("long_lived").await.unwrap();
        assert_eq!(value.as_deref(), Some("value"));
        scheduler.dispose().await;
    }

    #[tokio::test]
    async fn test_disabled_scheduler_is_stopped() {
        let cache = cache_with(
            MemoryBackend::new(),
            fast_config().with_automatic_cleanup(false),
        );

        let mut scheduler = CleanupScheduler::start(cache).unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        scheduler.dispose().await;
        assert_eq!(scheduler.state(), SchedulerState::Cancelled);
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let cache = cache_with(
            MemoryBackend::new(),
            fast_config().with_cleanup_interval(Duration::ZERO),
        );

        let result = CleanupScheduler::start(cache);
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_no_sweep_after_dispose() {
        let backend = MemoryBackend::new();
        let cache = cache_with(backend.clone(), fast_config());

        let mut scheduler = CleanupScheduler::start(cache.clone()).unwrap();
        scheduler.dispose().await;
        assert_eq!(scheduler.state(), SchedulerState::Cancelled);

        let swept_at = cache.last_cleanup_time().await;
        cache
            .set("short", "value", Some(Duration::from_millis(5)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(backend.len().await, 1, "No sweep may run after disposal");
        assert_eq!(cache.last_cleanup_time().await, swept_at);

        // Disposing twice is harmless
        scheduler.dispose().await;
    }

    #[tokio::test]
    async fn test_dispose_interrupts_stalled_sweep() {
        let backend = FlakyBackend::new();
        let cache = cache_with(backend.clone(), fast_config());
        backend.stall(true);

        let mut scheduler = CleanupScheduler::start(cache).unwrap();
        // Let the first sweep start and block on the substrate
        tokio::time::sleep(Duration::from_millis(120)).await;

        tokio::time::timeout(Duration::from_secs(1), scheduler.dispose())
            .await
            .expect("dispose should not wait for the stalled sweep");
        assert_eq!(scheduler.state(), SchedulerState::Cancelled);
    }

    #[tokio::test]
    async fn test_loop_survives_substrate_failures() {
        let backend = FlakyBackend::new();
        let cache = cache_with(backend.clone(), fast_config());

        let created = Utc::now() - chrono::Duration::minutes(5);
        let stale = encode(&CacheEntry::new(1, created, Some(created))).unwrap();
        backend.inner.set_item("cache_old", stale).await.unwrap();
        backend.fail_writes(true);
        backend.fail_list(true);

        let mut scheduler = CleanupScheduler::start(cache).unwrap();
        tokio::time::sleep(Duration::from_millis(130)).await;

        // Substrate recovers; the same loop picks the entry up
        backend.fail_writes(false);
        backend.fail_list(false);
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(backend.inner.is_empty().await);
        scheduler.dispose().await;
    }
}
