//! Store Accessor
//!
//! The only component that touches the substrate. Translates logical keys
//! through the namespace and hands raw entry text back and forth.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use super::KeyNamespace;
use crate::storage::{StorageBackend, StorageError};

/// Namespaced view over a shared [`StorageBackend`].
#[derive(Clone)]
pub struct StorageAccessor {
    backend: Arc<dyn StorageBackend>,
    namespace: KeyNamespace,
}

impl StorageAccessor {
    pub fn new(backend: Arc<dyn StorageBackend>, namespace: KeyNamespace) -> Self {
        Self { backend, namespace }
    }

    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend
            .get_item(&self.namespace.to_storage_key(key))
            .await
    }

    pub async fn set_raw(&self, key: &str, raw: String) -> Result<(), StorageError> {
        self.backend
            .set_item(&self.namespace.to_storage_key(key), raw)
            .await
    }

    pub async fn remove_raw(&self, key: &str) -> Result<(), StorageError> {
        self.backend
            .remove_item(&self.namespace.to_storage_key(key))
            .await
    }

    /// Logical keys of every item under the namespace.
    ///
    /// Enumeration is best-effort: a substrate failure yields an empty set.
    pub async fn list_keys(&self) -> BTreeSet<String> {
        match self.backend.list_all_keys().await {
            Ok(keys) => keys
                .iter()
                .filter(|key| self.namespace.owns(key))
                .map(|key| self.namespace.to_logical_key(key).to_string())
                .collect(),
            Err(e) => {
                warn!("Key enumeration failed, treating namespace as empty: {}", e);
                BTreeSet::new()
            }
        }
    }
}
