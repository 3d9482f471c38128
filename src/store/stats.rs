//! Store Statistics Module
//!
//! Counters kept by the memory store.

use serde::Serialize;

// == Store Stats ==
/// Snapshot of memory store activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    /// Keys found by a batch get
    pub hits: u64,
    /// Keys requested by a batch get but absent or expired
    pub misses: u64,
    /// Keys dropped to stay within capacity
    pub evictions: u64,
    /// Keys dropped because their TTL elapsed
    pub expirations: u64,
    /// Keys currently held
    pub total_entries: usize,
}

impl StoreStats {
    /// hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}
