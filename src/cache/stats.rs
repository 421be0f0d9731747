//! Cache Statistics Module
//!
//! On-demand snapshot of what the cache currently holds in the substrate.

use chrono::{DateTime, Utc};

// == Cache Statistics ==
/// Snapshot computed by scanning the namespace. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatistics {
    /// Keys under the cache namespace, decodable or not
    pub total_items: usize,
    /// Entries past their expiration that have not been removed yet
    pub expired_items: usize,
    /// Sum of encoded entry lengths times the configured size multiplier
    pub estimated_size_bytes: u64,
    /// Start of the most recent sweep, or cache construction time
    pub last_cleanup_time: DateTime<Utc>,
}

impl CacheStatistics {
    // == Constructor ==
    /// Creates an empty snapshot.
    pub fn new(last_cleanup_time: DateTime<Utc>) -> Self {
        Self {
            total_items: 0,
            expired_items: 0,
            estimated_size_bytes: 0,
            last_cleanup_time,
        }
    }

    // == Record Item ==
    /// Counts one namespaced key.
    pub fn record_item(&mut self) {
        self.total_items += 1;
    }

    // == Record Size ==
    /// Adds the estimated footprint of one encoded entry.
    pub fn record_size(&mut self, encoded_len: usize, multiplier: u64) {
        let estimate = (encoded_len as u64).saturating_mul(multiplier);
        self.estimated_size_bytes = self.estimated_size_bytes.saturating_add(estimate);
    }

    // == Record Expired ==
    pub fn record_expired(&mut self) {
        self.expired_items += 1;
    }
}
