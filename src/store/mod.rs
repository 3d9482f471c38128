//! Store Module
//!
//! The batch key/value backend contract consumed by the cache engine, plus
//! the in-memory backend that ships with the crate.

mod entry;
mod lru;
mod memory;
mod pairs;
mod stats;

use std::sync::Arc;

pub use entry::StoredValue;
pub use lru::LruTracker;
pub use memory::{MemoryStore, MemoryStoreError};
pub use pairs::Pairs;
pub use stats::StoreStats;

// == Public Constants ==
/// Maximum allowed key length in bytes for the memory store
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes for the memory store
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Store Trait ==
/// Batch key/value backend.
///
/// Keys are opaque UTF-8 strings and values opaque bytes. Implementations
/// decide eviction and how atomic a single batch call is; the engine never
/// relies on atomicity across calls.
pub trait Store: Send + Sync {
    /// Backend failure, surfaced to cache callers wrapped as a store error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Upserts every pair. `None` means no expiry, or whatever default
    /// persistence the backend applies.
    fn save(&self, pairs: Pairs, expire_secs: Option<u64>) -> Result<(), Self::Error>;

    /// Returns the subset of `keys` that hold a value. Missing keys are
    /// omitted, not reported as errors.
    fn get(&self, keys: &[&str]) -> Result<Pairs, Self::Error>;

    /// Removes `keys`. Removing a key that does not exist is not an error.
    fn delete(&self, keys: &[&str]) -> Result<(), Self::Error>;

    /// Reports whether `key` currently holds a value.
    fn exists(&self, key: &str) -> Result<bool, Self::Error>;
}

impl<S: Store + ?Sized> Store for Arc<S> {
    type Error = S::Error;

    fn save(&self, pairs: Pairs, expire_secs: Option<u64>) -> Result<(), Self::Error> {
        (**self).save(pairs, expire_secs)
    }

    fn get(&self, keys: &[&str]) -> Result<Pairs, Self::Error> {
        (**self).get(keys)
    }

    fn delete(&self, keys: &[&str]) -> Result<(), Self::Error> {
        (**self).delete(keys)
    }

    fn exists(&self, key: &str) -> Result<bool, Self::Error> {
        (**self).exists(key)
    }
}
