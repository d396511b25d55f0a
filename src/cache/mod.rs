//! Cache Module
//!
//! TTL-aware key-value caching: the in-process store engine and the async
//! backend contract consumed by the weather service.

mod backend;
mod entry;
mod pattern;
mod recency;
mod stats;
mod store;


// Re-export public types
pub use backend::{CacheBackend, DisabledCache, KeyTtl, MemoryCache};
pub use entry::CacheEntry;
pub use pattern::KeyPattern;
pub use recency::RecencyIndex;
pub use stats::StoreStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
