//! Configuration Module
//!
//! Cache engine settings plus the process-level configuration loaded from
//! environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Engine settings, fixed once the cache is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Expiration applied when `set` is given none, None = entries never expire
    pub default_expiration: Option<Duration>,
    /// Whether the background sweep is started
    pub automatic_cleanup_enabled: bool,
    /// Period between background sweeps
    pub cleanup_interval: Duration,
    /// Namespace prefix for every key the cache owns
    pub key_prefix: String,
    /// Factor applied to encoded entry length when estimating size.
    /// The default of 2 approximates two bytes per character.
    pub size_multiplier: u64,
}

impl CacheConfig {
    pub fn with_default_expiration(mut self, ttl: Option<Duration>) -> Self {
        self.default_expiration = ttl;
        self
    }

    pub fn with_automatic_cleanup(mut self, enabled: bool) -> Self {
        self.automatic_cleanup_enabled = enabled;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_size_multiplier(mut self, multiplier: u64) -> Self {
        self.size_multiplier = multiplier;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_expiration: None,
            automatic_cleanup_enabled: true,
            cleanup_interval: Duration::from_secs(60),
            key_prefix: "cache_".to_string(),
            size_multiplier: 2,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache engine settings
    pub cache: CacheConfig,
    /// HTTP server port
    pub server_port: u16,
    /// File substrate location, None = in-memory substrate
    pub storage_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Default TTL in seconds, 0 or unset = never expire
    /// - `CLEANUP_ENABLED` - Run the background sweep (default: true)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `KEY_PREFIX` - Namespace prefix (default: "cache_")
    /// - `SIZE_MULTIPLIER` - Size estimate factor (default: 2)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORAGE_PATH` - JSON file for the substrate (default: in-memory)
    pub fn from_env() -> Self {
        let defaults = CacheConfig::default();

        let cache = CacheConfig {
            default_expiration: parse_var::<u64>("DEFAULT_TTL")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            automatic_cleanup_enabled: parse_var("CLEANUP_ENABLED")
                .unwrap_or(defaults.automatic_cleanup_enabled),
            cleanup_interval: parse_var("CLEANUP_INTERVAL")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cleanup_interval),
            key_prefix: env::var("KEY_PREFIX").unwrap_or(defaults.key_prefix),
            size_multiplier: parse_var("SIZE_MULTIPLIER").unwrap_or(defaults.size_multiplier),
        };

        Self {
            cache,
            server_port: parse_var("SERVER_PORT").unwrap_or(3000),
            storage_path: env::var("STORAGE_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            server_port: 3000,
            storage_path: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
