//! TTL Cache - an in-process key-value cache with per-entry expiration
//!
//! Entries live in a pluggable storage substrate under a namespace prefix.
//! Expired entries are removed lazily on access and proactively by a
//! background sweep.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheEntry, CacheStatistics, CacheStore};
pub use config::{CacheConfig, Config};
pub use error::{CacheError, Result};
pub use storage::{FileBackend, MemoryBackend, StorageBackend, StorageError};
pub use tasks::{CleanupScheduler, SchedulerState};
