//! Error types for the entity cache
//!
//! Provides unified error handling using thiserror.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::codec::CodecError;

/// Boxed backend failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// == Phases ==
/// Direction of a failed codec call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecOp {
    Encode,
    Decode,
}

impl fmt::Display for CodecOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodecOp::Encode => "encode",
            CodecOp::Decode => "decode",
        })
    }
}

/// Backend operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Save,
    Get,
    Delete,
    Exists,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreOp::Save => "save",
            StoreOp::Get => "get",
            StoreOp::Delete => "delete",
            StoreOp::Exists => "exists",
        })
    }
}

// == Cache Error Enum ==
/// Unified error type for the entity cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Entity cannot produce a primary key where one is required
    #[error("{entity} has no primary cache key")]
    InvalidKey { entity: &'static str },

    /// Entity has neither a primary key nor any secondary keys to look up
    #[error("{entity} has neither a primary cache key nor secondary keys")]
    KeyUnavailable { entity: &'static str },

    /// Lookup completed but nothing is stored
    #[error("cache miss: {key}")]
    CacheMiss { key: String },

    /// Secondary keys of one lookup point at different primary keys
    #[error("secondary keys resolve to different primary keys: {primary_keys:?}")]
    ConflictingSubkeys { primary_keys: Vec<String> },

    /// Payload could not be encoded or decoded
    #[error("failed to {op} '{key}': {source}")]
    Serialization {
        op: CodecOp,
        key: String,
        #[source]
        source: CodecError,
    },

    /// Backend call failed
    #[error("store {op} failed: {source}")]
    Store {
        op: StoreOp,
        #[source]
        source: BoxError,
    },

    /// Invalid request data received over HTTP
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// True for a well-formed lookup that found nothing.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::CacheMiss { .. })
    }

    pub(crate) fn store<E>(op: StoreOp) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |source| CacheError::Store {
            op,
            source: Box::new(source),
        }
    }

    pub(crate) fn codec(op: CodecOp, key: impl Into<String>) -> impl FnOnce(CodecError) -> Self {
        let key = key.into();
        move |source| CacheError::Serialization { op, key, source }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::CacheMiss { .. } => StatusCode::NOT_FOUND,
            CacheError::InvalidKey { .. }
            | CacheError::KeyUnavailable { .. }
            | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::ConflictingSubkeys { .. } => StatusCode::CONFLICT,
            CacheError::Serialization { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Store { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStoreError;

    #[test]
    fn test_miss_is_distinguishable() {
        let miss = CacheError::CacheMiss {
            key: "user:1".to_string(),
        };
        let invalid = CacheError::InvalidKey { entity: "User" };

        assert!(miss.is_miss());
        assert!(!invalid.is_miss());
    }

    #[test]
    fn test_store_error_keeps_source_and_phase() {
        let err = CacheError::store(StoreOp::Save)(MemoryStoreError::EmptyKey);

        assert_eq!(err.to_string(), "store save failed: key must not be empty");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "key must not be empty");
    }

    #[test]
    fn test_codec_error_names_key() {
        let err = CacheError::codec(CodecOp::Encode, "user:1")(CodecError::EmptyPayload);
        assert_eq!(
            err.to_string(),
            "failed to encode 'user:1': codec produced an empty payload"
        );
    }

    #[test]
    fn test_status_codes() {
        let miss = CacheError::CacheMiss { key: "k".into() }.into_response();
        assert_eq!(miss.status(), StatusCode::NOT_FOUND);

        let bad = CacheError::InvalidRequest("empty key".into()).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let store = CacheError::store(StoreOp::Get)(MemoryStoreError::EmptyKey).into_response();
        assert_eq!(store.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
