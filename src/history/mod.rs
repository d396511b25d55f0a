//! History Module
//!
//! Append-only record of observed weather samples, queryable per city.

mod memory;
mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::weather::WeatherSample;

pub use memory::MemoryHistoryStore;
pub use sqlite::SqliteHistoryStore;

/// Default number of records returned by a history query
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;
/// Largest number of records a history query may ask for
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// A stored sample with its store-assigned id and capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    #[serde(flatten)]
    pub sample: WeatherSample,
    pub captured_at: DateTime<Utc>,
}

/// Durable store of weather samples.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends a sample and returns the stored record.
    async fn save_sample(&self, sample: &WeatherSample) -> Result<HistoryRecord, PersistenceError>;

    /// Most recent records for `city`, newest first, at most `limit`.
    ///
    /// Cities match on their normalized form, the same one cache keys use.
    async fn get_history(&self, city: &str, limit: u32) -> Result<Vec<HistoryRecord>, PersistenceError>;

    async fn health_check(&self) -> bool;
}
