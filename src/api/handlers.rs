//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::Cache;
use crate::codec::{Codec, Format};
use crate::config::Config;
use crate::error::{CacheError, Result, StoreOp};
use crate::models::{DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse};
use crate::store::{MemoryStore, Store};

/// Cache served over HTTP: the memory store behind the entity cache engine.
pub type ServiceCache = Cache<Arc<MemoryStore>, Format>;

/// Application state shared across all handlers.
///
/// The engine takes no locks of its own; the memory store synchronizes
/// internally, so handlers share it through a plain `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ServiceCache>,
}

impl AppState {
    /// Creates a new AppState over `store` using `codec` for values.
    pub fn new(store: Arc<MemoryStore>, codec: Format) -> Self {
        Self {
            cache: Arc::new(Cache::new(store, codec)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(MemoryStore::from_config(config)), config.codec)
    }

    /// The memory store, shared with background tasks.
    pub fn store(&self) -> &Arc<MemoryStore> {
        self.cache.store()
    }
}

/// Handler for PUT /set
///
/// Stores a value in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.cache.write(&req.key, &req.value, req.ttl)?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value: String = state.cache.read(&key)?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache. Deleting an unknown key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let existed = state
        .store()
        .exists(&key)
        .map_err(CacheError::store(StoreOp::Exists))?;
    state.cache.delete(&[key.as_str()])?;

    Ok(Json(DeleteResponse::new(key, existed)))
}

/// Handler for GET /stats
///
/// Returns memory store statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.store().stats(),
        state.cache.codec().name(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
