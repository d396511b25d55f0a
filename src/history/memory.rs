//! In-memory history store
//!
//! Keeps samples in a vector for the lifetime of the process.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::PersistenceError;
use crate::history::{HistoryRecord, HistoryStore};
use crate::weather::{normalize_city, WeatherSample};

/// In-process history used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: RwLock<Vec<HistoryRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn save_sample(&self, sample: &WeatherSample) -> Result<HistoryRecord, PersistenceError> {
        let mut records = self.records.write().await;
        let record = HistoryRecord {
            id: records.len() as i64 + 1,
            sample: sample.clone(),
            captured_at: Utc::now(),
        };
        records.push(record.clone());
        info!(city = %sample.city, id = record.id, "weather sample saved");
        Ok(record)
    }

    async fn get_history(&self, city: &str, limit: u32) -> Result<Vec<HistoryRecord>, PersistenceError> {
        let city = normalize_city(city);
        let records = self.records.read().await;
        // Appended in id order, so reverse iteration is newest first.
        Ok(records
            .iter()
            .rev()
            .filter(|r| normalize_city(&r.sample.city) == city)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(city: &str, temperature: f64) -> WeatherSample {
        WeatherSample {
            city: city.to_string(),
            country: "FR".to_string(),
            temperature,
            feels_like: temperature,
            humidity: 50,
            pressure: 1012.0,
            wind_speed: 1.0,
            description: "clouds".to_string(),
            icon: "03d".to_string(),
        }
    }

    #[tokio::test]
    async fn test_newest_first_with_limit() {
        let store = MemoryHistoryStore::new();
        for t in [10.0, 11.0, 12.0] {
            store.save_sample(&sample("Paris", t)).await.unwrap();
        }
        store.save_sample(&sample("Lyon", 20.0)).await.unwrap();

        let history = store.get_history("paris ", 2).await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sample.temperature, 12.0);
        assert_eq!(history[1].sample.temperature, 11.0);
        assert!(history[0].id > history[1].id);
        assert_eq!(store.len().await, 4);
    }

    #[tokio::test]
    async fn test_non_ascii_city_ignores_case() {
        let store = MemoryHistoryStore::new();
        store.save_sample(&sample("São Paulo", 27.0)).await.unwrap();

        let history = store.get_history("SÃO PAULO", 10).await.unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sample.city, "São Paulo");
    }

    #[tokio::test]
    async fn test_unknown_city_is_empty() {
        let store = MemoryHistoryStore::new();
        store.save_sample(&sample("Paris", 10.0)).await.unwrap();

        assert!(store.get_history("Berlin", 10).await.unwrap().is_empty());
        assert!(store.health_check().await);
    }
}
