//! Tool argument models
//!
//! Defines the JSON argument objects accepted by each tool. Missing fields
//! fall back to their defaults; ranges are checked by `validate`, never
//! clamped.

use serde::Deserialize;

use crate::history::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};

/// Forecast span used when a request does not name one
pub const DEFAULT_FORECAST_DAYS: u32 = 3;
pub const MIN_FORECAST_DAYS: u32 = 1;
pub const MAX_FORECAST_DAYS: u32 = 5;

fn default_days() -> i64 {
    i64::from(DEFAULT_FORECAST_DAYS)
}

fn default_limit() -> i64 {
    i64::from(DEFAULT_HISTORY_LIMIT)
}

fn check_range(name: &str, value: i64, min: u32, max: u32) -> Result<u32, String> {
    u32::try_from(value)
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or_else(|| format!("{name} must be between {min} and {max}, got {value}"))
}

/// Arguments for tools that take only a city
/// (`get_current_weather`, `clear_city_cache`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityArgs {
    #[serde(default)]
    pub city: String,
}

/// Arguments for `get_weather_forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastArgs {
    #[serde(default)]
    pub city: String,
    /// Signed so that negative input is reported as out of range
    #[serde(default = "default_days")]
    pub days: i64,
}

impl ForecastArgs {
    /// Checks the day span and returns it as an unsigned count.
    pub fn validate(&self) -> Result<u32, String> {
        check_range("days", self.days, MIN_FORECAST_DAYS, MAX_FORECAST_DAYS)
    }
}

/// Arguments for `get_weather_history`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryArgs {
    #[serde(default)]
    pub city: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl HistoryArgs {
    /// Checks the city and limit; returns the limit on success.
    pub fn validate(&self) -> Result<u32, String> {
        if self.city.trim().is_empty() {
            return Err("City parameter is required and cannot be empty".to_string());
        }
        check_range("limit", self.limit, 1, MAX_HISTORY_LIMIT)
    }
}
