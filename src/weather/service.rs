//! Cache-aside weather service.
//!
//! Reads go to the cache first; on a miss the provider is called and the
//! result written back with the TTL for its kind. The cache is never a
//! correctness dependency: read failures count as misses and write failures
//! are logged and dropped.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheBackend, StoreStats};
use crate::error::{CacheError, Result, WeatherError};
use crate::weather::keys::{CacheKey, CachePolicy, FORECAST_PREFIX, WEATHER_PREFIX};
use crate::weather::{ForecastBundle, WeatherProvider, WeatherSample};

// == Lookup ==
/// Where a looked-up value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Cache,
    Provider,
}

/// A value returned by the service together with its source.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<T> {
    pub value: T,
    pub source: LookupSource,
}

impl<T> Lookup<T> {
    pub fn from_cache(&self) -> bool {
        self.source == LookupSource::Cache
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

// == Cache Write ==
/// Outcome of a best-effort cache write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWrite {
    Written,
    /// The cache was unavailable, nothing attempted
    Skipped,
    Failed(String),
}

// == Statistics ==
/// Key counts per namespace plus whatever the store itself tracks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatistics {
    pub weather_entries: usize,
    pub forecast_entries: usize,
    pub total_entries: usize,
    /// None when the cache is unavailable
    pub store: Option<StoreStats>,
}

/// Checks a city argument and returns it trimmed.
pub fn validate_city(city: &str) -> Result<&str> {
    let city = city.trim();
    if city.is_empty() {
        return Err(WeatherError::validation(
            "City parameter is required and cannot be empty",
        ));
    }
    if city.contains([':', '*', '?']) {
        return Err(WeatherError::validation(format!(
            "City name contains invalid characters: {city}"
        )));
    }
    Ok(city)
}

// == Weather Service ==
/// Serves weather data through the cache, calling the provider on misses.
#[derive(Clone)]
pub struct WeatherService {
    cache: Arc<dyn CacheBackend>,
    provider: Arc<dyn WeatherProvider>,
    policy: CachePolicy,
}

impl WeatherService {
    pub fn new(
        cache: Arc<dyn CacheBackend>,
        provider: Arc<dyn WeatherProvider>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            cache,
            provider,
            policy,
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    // == Current Weather ==
    pub async fn get_current_weather(&self, city: &str) -> Result<Lookup<WeatherSample>> {
        let city = validate_city(city)?;
        let key = CacheKey::weather(city);

        if let Some(sample) = self.read_cached::<WeatherSample>(&key).await {
            info!(city, "weather data served from cache");
            return Ok(Lookup {
                value: sample,
                source: LookupSource::Cache,
            });
        }

        let sample = self
            .provider
            .current_weather(city)
            .await
            .map_err(|source| WeatherError::provider(city, source))?;

        self.write_cached(&key, &sample).await;
        info!(city, "weather data fetched from provider");

        Ok(Lookup {
            value: sample,
            source: LookupSource::Provider,
        })
    }

    // == Forecast ==
    pub async fn get_weather_forecast(&self, city: &str, days: u32) -> Result<Lookup<ForecastBundle>> {
        let city = validate_city(city)?;
        if !self.policy.forecast_days().contains(&days) {
            return Err(WeatherError::validation(format!(
                "days must be between {} and {}, got {}",
                self.policy.min_forecast_days, self.policy.max_forecast_days, days
            )));
        }
        let key = CacheKey::forecast(city, days);

        if let Some(bundle) = self.read_cached::<ForecastBundle>(&key).await {
            info!(city, days, "forecast served from cache");
            return Ok(Lookup {
                value: bundle,
                source: LookupSource::Cache,
            });
        }

        let bundle = self
            .provider
            .forecast(city, days)
            .await
            .map_err(|source| WeatherError::provider(city, source))?;

        self.write_cached(&key, &bundle).await;
        info!(city, days, "forecast fetched from provider");

        Ok(Lookup {
            value: bundle,
            source: LookupSource::Provider,
        })
    }

    // == Invalidation ==
    /// Drops the current-weather entry and every forecast entry for a city.
    ///
    /// Returns how many keys were removed.
    pub async fn clear_cache_for_city(&self, city: &str) -> Result<usize> {
        let city = validate_city(city)?;

        let mut keys = vec![CacheKey::weather(city).to_string()];
        match self.cache.keys(&CacheKey::forecast_pattern(city)).await {
            Ok(forecast_keys) => keys.extend(forecast_keys),
            Err(e) => warn!(city, error = %e, "could not list forecast keys"),
        }

        let mut removed = 0;
        for key in &keys {
            match self.cache.delete(key).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => warn!(key = %key, error = %e, "cache delete failed"),
            }
        }

        info!(city, removed, "cache cleared for city");
        Ok(removed)
    }

    /// Flushes the whole cache. False if the cache could not be cleared.
    pub async fn clear_all_cache(&self) -> bool {
        match self.cache.clear_all().await {
            Ok(cleared) => {
                info!("all cache entries cleared");
                cleared
            }
            Err(e) => {
                warn!(error = %e, "cache flush failed");
                false
            }
        }
    }

    // == Statistics ==
    /// Read-only summary of what the cache holds.
    pub async fn get_cache_statistics(&self) -> CacheStatistics {
        let weather_entries = self.count_keys(WEATHER_PREFIX).await;
        let forecast_entries = self.count_keys(FORECAST_PREFIX).await;
        let store = match self.cache.stats().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "cache stats unavailable");
                None
            }
        };

        CacheStatistics {
            weather_entries,
            forecast_entries,
            total_entries: weather_entries + forecast_entries,
            store,
        }
    }

    pub async fn cache_healthy(&self) -> bool {
        self.cache.health_check().await
    }

    /// Number of live current-weather keys.
    pub async fn cached_weather_count(&self) -> usize {
        self.count_keys(WEATHER_PREFIX).await
    }

    async fn count_keys(&self, prefix: &str) -> usize {
        match self.cache.keys(&CacheKey::namespace_pattern(prefix)).await {
            Ok(keys) => keys.len(),
            Err(e) => {
                debug!(prefix, error = %e, "cache key listing failed");
                0
            }
        }
    }

    // == Cache plumbing ==
    /// Cached value under `key`, or None on a miss, a cache failure, or an
    /// undecodable payload.
    async fn read_cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let key = key.to_string();
        let raw = match self.cache.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key = %key, "cache hit");
                Some(value)
            }
            Err(e) => {
                let e = CacheError::Serialization(e.to_string());
                warn!(key = %key, error = %e, "cached value undecodable, treating as miss");
                None
            }
        }
    }

    async fn write_cached<T: Serialize>(&self, key: &CacheKey, value: &T) -> CacheWrite {
        let ttl_secs = self.policy.ttl_for(key);
        let key = key.to_string();

        let outcome = match serde_json::to_string(value) {
            Err(e) => CacheWrite::Failed(CacheError::Serialization(e.to_string()).to_string()),
            Ok(payload) => match self.cache.set(&key, payload, ttl_secs).await {
                Ok(true) => CacheWrite::Written,
                Ok(false) => CacheWrite::Skipped,
                Err(CacheError::Unavailable(_)) => CacheWrite::Skipped,
                Err(e) => CacheWrite::Failed(e.to_string()),
            },
        };

        match &outcome {
            CacheWrite::Written => debug!(key = %key, ttl_secs, "cached"),
            CacheWrite::Skipped => debug!(key = %key, "cache unavailable, write skipped"),
            CacheWrite::Failed(reason) => warn!(key = %key, reason = %reason, "cache write failed"),
        }
        outcome
    }
}
