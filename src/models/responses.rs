//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::cache::{format_timestamp, CacheEntry, CacheStatistics};

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
    /// When the entry was written
    pub created_at: String,
    /// When the entry expires, None = never
    pub expires_at: Option<String>,
    /// Remaining lifetime in milliseconds, None = never expires
    pub ttl_remaining_ms: Option<u64>,
}

impl GetResponse {
    /// Creates a GetResponse from a live entry
    pub fn new(key: impl Into<String>, entry: CacheEntry<Value>, now: DateTime<Utc>) -> Self {
        let ttl_remaining_ms = entry
            .time_to_live(now)
            .map(|ttl| u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX));
        Self {
            key: key.into(),
            created_at: format_timestamp(entry.created_at),
            expires_at: entry.expires_at.map(format_timestamp),
            ttl_remaining_ms,
            value: entry.value,
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for GET /exists/:key
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for GET /keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    /// Logical keys, sorted
    pub keys: Vec<String>,
    pub count: usize,
}

impl KeysResponse {
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        let keys: Vec<String> = keys.into_iter().collect();
        Self {
            count: keys.len(),
            keys,
        }
    }
}

/// Response body for POST /cleanup
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Expired entries removed by this sweep
    pub removed: usize,
    pub last_cleanup_time: String,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Entries under the cache namespace
    pub total_items: usize,
    /// Entries past expiration not yet removed
    pub expired_items: usize,
    /// Estimated footprint in bytes
    pub estimated_size_bytes: u64,
    /// Start of the most recent sweep
    pub last_cleanup_time: String,
}

impl From<CacheStatistics> for StatsResponse {
    fn from(stats: CacheStatistics) -> Self {
        Self {
            total_items: stats.total_items,
            expired_items: stats.expired_items,
            estimated_size_bytes: stats.estimated_size_bytes,
            last_cleanup_time: format_timestamp(stats.last_cleanup_time),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_get_response_reports_ttl() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let entry = CacheEntry::new(
            json!("test_value"),
            created,
            Some(created + chrono::Duration::seconds(30)),
        );

        let resp = GetResponse::new("test_key", entry, created + chrono::Duration::seconds(10));
        assert_eq!(resp.ttl_remaining_ms, Some(20_000));
        assert_eq!(resp.expires_at.as_deref(), Some("2024-01-01T00:00:30.000000000Z"));

        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("test_key"));
        assert!(json.contains("test_value"));
    }

    #[test]
    fn test_get_response_never_expires() {
        let entry = CacheEntry::new(json!(1), Utc::now(), None);
        let resp = GetResponse::new("k", entry, Utc::now());
        assert!(resp.ttl_remaining_ms.is_none());
        assert!(resp.expires_at.is_none());
    }

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("my_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("deleted_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("deleted_key"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_keys_response_count() {
        let resp = KeysResponse::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(resp.count, 2);
    }

    #[test]
    fn test_stats_response_from_statistics() {
        let mut stats = CacheStatistics::new(Utc::now());
        stats.record_item();
        stats.record_size(10, 2);

        let resp = StatsResponse::from(stats);
        assert_eq!(resp.total_items, 1);
        assert_eq!(resp.estimated_size_bytes, 20);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
