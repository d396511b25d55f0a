//! Weather Module
//!
//! Domain types, the provider contract with its OpenWeatherMap client, key
//! derivation, and the cache-aside service tying them together.

mod keys;
mod openweather;
mod provider;
mod service;
mod types;

pub use keys::{normalize_city, CacheKey, CachePolicy, FORECAST_PREFIX, WEATHER_PREFIX};
pub use openweather::OpenWeatherClient;
pub use provider::WeatherProvider;
pub use service::{validate_city, CacheStatistics, CacheWrite, Lookup, LookupSource, WeatherService};
pub use types::{ForecastBundle, ForecastEntry, WeatherSample};
