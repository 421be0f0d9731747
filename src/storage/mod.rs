//! Storage Substrate Module
//!
//! The durable key-value layer the cache is built on. The cache only ever
//! talks to a [`StorageBackend`]; namespacing and entry encoding happen above
//! this boundary.

mod file;
mod memory;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileBackend;
pub use memory::MemoryBackend;

// == Storage Error ==
/// Failure reported by a substrate implementation.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The substrate's own persisted representation could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The substrate refused or could not serve the request
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// == Storage Backend ==
/// Opaque string-to-string store shared with unrelated data.
///
/// Implementations must make each single-key operation atomic; the cache
/// relies on nothing stronger.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Returns the stored value, or `None` when the key is absent.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value`, replacing whatever was there.
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Removes the key. Removing an absent key succeeds.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Lists every key in the substrate, including ones the cache does not own.
    async fn list_all_keys(&self) -> Result<Vec<String>, StorageError>;
}
