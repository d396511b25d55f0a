//! Cache Entry Module
//!
//! A single stored value together with its expiry deadline.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
///
/// Deadlines use `tokio::time::Instant` so expiry follows the runtime clock,
/// which tests can pause and advance.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The serialized value
    pub value: String,
    /// When the entry was written
    pub created_at: Instant,
    /// Expiration deadline, None = no expiration
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` from now.
    ///
    /// A TTL too large for the clock to represent means no expiration.
    pub fn new(value: String, ttl_seconds: Option<u64>) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: ttl_seconds.and_then(|ttl| now.checked_add(Duration::from_secs(ttl))),
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub(crate) fn is_expired_at(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }

    // == Time To Live ==
    /// Remaining lifetime, or None if the entry never expires.
    ///
    /// Saturates at zero once the deadline has passed.
    pub fn remaining(&self) -> Option<Duration> {
        let now = Instant::now();
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Remaining lifetime in whole seconds, rounded to the nearest second.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.remaining()
            .map(|left| (left.as_millis() as u64 + 500) / 1000)
    }
}
