//! Error types for the cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::storage::StorageError;

// == Cache Error Enum ==
/// Unified error type for the cache engine and its HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Malformed caller input, rejected before any I/O
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Key not found in cache (HTTP surface only; the engine reports misses as `None`)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Substrate write or removal failed
    #[error("Storage {operation} failed for key '{key}': {source}")]
    StorageWrite {
        operation: &'static str,
        key: String,
        #[source]
        source: StorageError,
    },

    /// The operation's cancellation signal fired before it completed
    #[error("Operation cancelled: {action}")]
    Cancelled { action: String },

    /// A memoized upstream fetch failed
    #[error("Upstream fetch failed: {0}")]
    Upstream(#[from] anyhow::Error),
}

impl CacheError {
    /// Shorthand for a cancelled outcome of the named action.
    pub fn cancelled(action: impl Into<String>) -> Self {
        CacheError::Cancelled {
            action: action.into(),
        }
    }

    /// Returns true for the `Cancelled` variant.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CacheError::Cancelled { .. })
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Cancelled { .. } => StatusCode::CONFLICT,
            CacheError::Upstream(_) => StatusCode::BAD_GATEWAY,
            CacheError::StorageWrite { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache service.
pub type Result<T> = std::result::Result<T, CacheError>;
