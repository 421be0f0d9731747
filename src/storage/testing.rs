//! Fault-injecting substrate for unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{MemoryBackend, StorageBackend, StorageError};

/// Wraps a [`MemoryBackend`] and fails or stalls on demand.
#[derive(Clone, Default)]
pub struct FlakyBackend {
    pub inner: MemoryBackend,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    fail_list: Arc<AtomicBool>,
    stall: Arc<AtomicBool>,
    fail_remove_for: Arc<Mutex<HashSet<String>>>,
}

impl FlakyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    pub fn fail_list(&self, on: bool) {
        self.fail_list.store(on, Ordering::SeqCst);
    }

    /// Every operation sleeps for an hour while set.
    pub fn stall(&self, on: bool) {
        self.stall.store(on, Ordering::SeqCst);
    }

    pub fn fail_remove_for(&self, storage_key: &str) {
        self.fail_remove_for
            .lock()
            .unwrap()
            .insert(storage_key.to_string());
    }

    async fn pause(&self) {
        if self.stall.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            Err(StorageError::Unavailable(format!("injected {} failure", what)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StorageBackend for FlakyBackend {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.pause().await;
        Self::check(&self.fail_reads, "read")?;
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.pause().await;
        Self::check(&self.fail_writes, "write")?;
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.pause().await;
        Self::check(&self.fail_writes, "remove")?;
        if self.fail_remove_for.lock().unwrap().contains(key) {
            return Err(StorageError::Unavailable(format!("cannot remove {}", key)));
        }
        self.inner.remove_item(key).await
    }

    async fn list_all_keys(&self) -> Result<Vec<String>, StorageError> {
        self.pause().await;
        Self::check(&self.fail_list, "list")?;
        self.inner.list_all_keys().await
    }
}
