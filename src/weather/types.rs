//! Weather data types shared by the provider, the cache and the history store.

use serde::{Deserialize, Serialize};

/// Current conditions observed for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub city: String,
    pub country: String,
    /// °C
    pub temperature: f64,
    /// °C
    pub feels_like: f64,
    /// Relative humidity, 0–100
    pub humidity: u8,
    /// hPa
    pub pressure: f64,
    /// m/s
    pub wind_speed: f64,
    pub description: String,
    /// Provider icon code, e.g. `01d`
    pub icon: String,
}

impl WeatherSample {
    /// Checks the value ranges a sample must satisfy.
    ///
    /// Returns a description of the first violation, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.city.trim().is_empty() {
            return Some("city must not be empty".to_string());
        }
        if self.humidity > 100 {
            return Some(format!("humidity {} is outside 0-100", self.humidity));
        }
        if self.pressure.is_nan() || self.pressure <= 0.0 {
            return Some(format!("pressure {} must be positive", self.pressure));
        }
        if self.wind_speed.is_nan() || self.wind_speed < 0.0 {
            return Some(format!("wind speed {} must not be negative", self.wind_speed));
        }
        None
    }
}

/// One 3-hour forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix seconds, start of the slot
    pub timestamp: i64,
    /// Provider's text form of the slot time, e.g. `2024-05-01 12:00:00`
    pub time_text: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: f64,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    /// Probability of precipitation, 0.0–1.0
    pub precipitation_probability: f64,
}

/// Forecast for a city over a span of days, ordered by time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub city: String,
    pub country: String,
    pub forecasts: Vec<ForecastEntry>,
}
