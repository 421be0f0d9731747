//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::Value;

use crate::cache::{ActionSlots, CacheStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    CleanupResponse, DeleteResponse, ExistsResponse, GetResponse, HealthResponse, KeysResponse,
    SetRequest, SetResponse, StatsResponse,
};
use crate::storage::{FileBackend, MemoryBackend, StorageBackend};

/// Application state shared across all handlers.
///
/// The cache itself is safe to share; `actions` tracks the in-flight
/// instance of each caller-triggered bulk action.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache engine
    pub cache: Arc<CacheStore>,
    /// One cancellation slot per bulk action
    pub actions: ActionSlots,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore) -> Self {
        Self {
            cache: Arc::new(cache),
            actions: ActionSlots::new(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Uses a file substrate when `storage_path` is set, otherwise an
    /// in-memory one.
    pub fn from_config(config: &Config) -> Self {
        let backend: Arc<dyn StorageBackend> = match &config.storage_path {
            Some(path) => Arc::new(FileBackend::new(path)),
            None => Arc::new(MemoryBackend::new()),
        };
        Self::new(CacheStore::new(backend, config.cache.clone()))
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }

    state.cache.set(&req.key, &req.value, req.ttl()).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a live value and its metadata.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let entry = state
        .cache
        .get_entry::<Value>(&key)
        .await?
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, entry, Utc::now())))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache. Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.remove(&key).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ExistsResponse>> {
    let exists = state.cache.exists(&key).await?;

    Ok(Json(ExistsResponse { key, exists }))
}

/// Handler for GET /keys
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    Json(KeysResponse::new(state.cache.get_all_keys().await))
}

/// Handler for DELETE /clear
///
/// A second clear issued while one is running cancels the first.
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<KeysResponse>> {
    state.actions.run("clear", state.cache.clear()).await?;

    Ok(Json(KeysResponse::new(state.cache.get_all_keys().await)))
}

/// Handler for POST /cleanup
///
/// Runs a sweep now; re-triggering cancels the sweep still in flight.
pub async fn cleanup_handler(State(state): State<AppState>) -> Result<Json<CleanupResponse>> {
    let removed = state
        .actions
        .run("cleanup", state.cache.clean_expired_items())
        .await?;

    Ok(Json(CleanupResponse {
        removed,
        last_cleanup_time: crate::cache::format_timestamp(state.cache.last_cleanup_time().await),
    }))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state
        .actions
        .run("stats", async { Ok(state.cache.get_statistics().await) })
        .await?;

    Ok(Json(stats.into()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
