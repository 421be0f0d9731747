//! Key Namespacer
//!
//! Maps logical cache keys onto prefixed storage keys so the cache can share
//! a substrate with unrelated data and enumerate exactly its own keys.

/// Constant prefix applied to every key this cache owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNamespace {
    prefix: String,
}

impl KeyNamespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Prefix + logical key. No escaping is applied.
    pub fn to_storage_key(&self, logical_key: &str) -> String {
        format!("{}{}", self.prefix, logical_key)
    }

    /// Strips the prefix; input without the prefix is returned unchanged.
    pub fn to_logical_key<'a>(&self, storage_key: &'a str) -> &'a str {
        storage_key
            .strip_prefix(self.prefix.as_str())
            .unwrap_or(storage_key)
    }

    /// Whether a storage key belongs to this namespace.
    pub fn owns(&self, storage_key: &str) -> bool {
        storage_key.starts_with(self.prefix.as_str())
    }
}
