//! Entity Cache - a storage-agnostic object cache
//!
//! Caches serde entities by a primary key and finds them again by primary or
//! secondary keys on top of any batch key/value [`Store`]. Ships with an
//! in-memory store, JSON and bincode codecs, and an HTTP service.

pub mod api;
pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cachable, Cache};
pub use codec::{BincodeCodec, Codec, CodecError, Format, JsonCodec};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{MemoryStore, Pairs, Store};
pub use tasks::spawn_sweep_task;
