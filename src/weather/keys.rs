//! Cache key derivation and TTL policy.
//!
//! Keys are `<kind>:<city>[:<params>]` with the city trimmed and lower-cased,
//! e.g. `weather:london`, `forecast:london:3`.

use std::fmt;
use std::ops::RangeInclusive;

/// Current conditions namespace
pub const WEATHER_PREFIX: &str = "weather";
/// Forecast namespace
pub const FORECAST_PREFIX: &str = "forecast";

/// Canonical form of a city name inside cache keys.
pub fn normalize_city(city: &str) -> String {
    city.trim().to_lowercase()
}

// == Cache Key ==
/// A derived cache key. Equal requests always produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Weather { city: String },
    Forecast { city: String, days: u32 },
}

impl CacheKey {
    pub fn weather(city: &str) -> Self {
        CacheKey::Weather {
            city: normalize_city(city),
        }
    }

    pub fn forecast(city: &str, days: u32) -> Self {
        CacheKey::Forecast {
            city: normalize_city(city),
            days,
        }
    }

    /// Pattern matching every forecast key for a city.
    pub fn forecast_pattern(city: &str) -> String {
        format!("{}:{}:*", FORECAST_PREFIX, normalize_city(city))
    }

    /// Pattern matching every key of a namespace.
    pub fn namespace_pattern(prefix: &str) -> String {
        format!("{prefix}:*")
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Weather { city } => write!(f, "{WEATHER_PREFIX}:{city}"),
            CacheKey::Forecast { city, days } => write!(f, "{FORECAST_PREFIX}:{city}:{days}"),
        }
    }
}

// == Cache Policy ==
/// TTLs per data kind and the accepted forecast span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    /// Seconds a current-weather entry stays cached
    pub weather_ttl: u64,
    /// Seconds a forecast entry stays cached
    pub forecast_ttl: u64,
    pub min_forecast_days: u32,
    pub max_forecast_days: u32,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            weather_ttl: 600,
            forecast_ttl: 3600,
            min_forecast_days: 1,
            max_forecast_days: 5,
        }
    }
}

impl CachePolicy {
    pub fn ttl_for(&self, key: &CacheKey) -> u64 {
        match key {
            CacheKey::Weather { .. } => self.weather_ttl,
            CacheKey::Forecast { .. } => self.forecast_ttl,
        }
    }

    pub fn forecast_days(&self) -> RangeInclusive<u32> {
        self.min_forecast_days..=self.max_forecast_days
    }
}
