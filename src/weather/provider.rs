//! Weather provider contract.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::weather::{ForecastBundle, WeatherSample};

/// Source of truth for weather data. Stateless apart from configuration.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for `city`.
    async fn current_weather(&self, city: &str) -> Result<WeatherSample, ProviderError>;

    /// Forecast for `city` covering `days` days.
    async fn forecast(&self, city: &str, days: u32) -> Result<ForecastBundle, ProviderError>;
}
