//! Stored Value Module
//!
//! A payload held by the memory store together with its expiry deadline.

use std::time::{Duration, Instant};

// == Stored Value ==
/// Payload plus optional deadline.
#[derive(Debug, Clone)]
pub struct StoredValue {
    /// The stored payload
    pub data: Vec<u8>,
    /// Instant after which the value is gone, None = no expiration
    pub expires_at: Option<Instant>,
}

impl StoredValue {
    /// Creates a value that expires `ttl_secs` seconds from now, or never.
    pub fn new(data: Vec<u8>, ttl_secs: Option<u64>) -> Self {
        Self::created_at(data, ttl_secs, Instant::now())
    }

    fn created_at(data: Vec<u8>, ttl_secs: Option<u64>, now: Instant) -> Self {
        let expires_at = ttl_secs.and_then(|secs| now.checked_add(Duration::from_secs(secs)));
        Self { data, expires_at }
    }

    // == Is Expired ==
    /// Checks whether the deadline has passed at `now`.
    ///
    /// A value is expired once `now` reaches the deadline, so a full TTL
    /// elapsed means gone.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Remaining lifetime, `Some(Duration::ZERO)` once expired, None without TTL.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}
