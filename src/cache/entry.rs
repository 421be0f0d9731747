//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::policy;

// == Cache Entry ==
/// A stored value with its creation and expiration metadata.
///
/// Entries are never mutated in place; changing the expiration means writing
/// a new entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Creation instant (UTC)
    pub created_at: DateTime<Utc>,
    /// Expiration instant (UTC), None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry created at `created_at`.
    pub fn new(value: T, created_at: DateTime<Utc>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value,
            created_at,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        policy::is_expired(self.expires_at, now)
    }

    // == Time To Live ==
    /// Returns the remaining lifetime as of `now`.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has an expiration that hasn't passed
    /// - `None` if the entry never expires
    pub fn time_to_live(&self, now: DateTime<Utc>) -> Option<Duration> {
        policy::remaining(self.expires_at, now)
    }
}
