//! Configuration Module
//!
//! Handles loading service configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::weather::CachePolicy;

/// Default OpenWeatherMap endpoint
pub const DEFAULT_WEATHER_API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// When false the service runs without a cache
    pub cache_enabled: bool,
    /// Maximum number of entries the cache can hold
    pub cache_max_entries: usize,
    /// Background expiry sweep interval in seconds
    pub cache_cleanup_interval: u64,
    /// TTL in seconds for current-weather entries
    pub weather_cache_ttl: u64,
    /// TTL in seconds for forecast entries
    pub forecast_cache_ttl: u64,
    pub weather_api_key: Option<String>,
    pub weather_api_base_url: String,
    /// Provider request timeout in seconds
    pub weather_api_timeout: u64,
    /// SQLite URL for the history store; in-memory history when unset
    pub database_url: Option<String>,
}

fn parsed<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_ENABLED` - Enable the cache (default: true)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    /// - `WEATHER_CACHE_TTL` - Current weather TTL in seconds (default: 600)
    /// - `FORECAST_CACHE_TTL` - Forecast TTL in seconds (default: 3600)
    /// - `WEATHER_API_KEY` - OpenWeatherMap API key (no default)
    /// - `WEATHER_API_BASE_URL` - Provider base URL
    /// - `WEATHER_API_TIMEOUT` - Provider timeout in seconds (default: 10)
    /// - `DATABASE_URL` - SQLite URL for history (default: in-memory)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parsed("SERVER_PORT", defaults.server_port),
            cache_enabled: parsed("CACHE_ENABLED", defaults.cache_enabled),
            cache_max_entries: parsed("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_cleanup_interval: parsed("CACHE_CLEANUP_INTERVAL", defaults.cache_cleanup_interval),
            weather_cache_ttl: parsed("WEATHER_CACHE_TTL", defaults.weather_cache_ttl),
            forecast_cache_ttl: parsed("FORECAST_CACHE_TTL", defaults.forecast_cache_ttl),
            weather_api_key: non_empty("WEATHER_API_KEY"),
            weather_api_base_url: non_empty("WEATHER_API_BASE_URL")
                .unwrap_or(defaults.weather_api_base_url),
            weather_api_timeout: parsed("WEATHER_API_TIMEOUT", defaults.weather_api_timeout),
            database_url: non_empty("DATABASE_URL"),
        }
    }

    /// Cache policy derived from the configured TTLs.
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            weather_ttl: self.weather_cache_ttl,
            forecast_ttl: self.forecast_cache_ttl,
            ..CachePolicy::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_enabled: true,
            cache_max_entries: 1000,
            cache_cleanup_interval: 1,
            weather_cache_ttl: 600,
            forecast_cache_ttl: 3600,
            weather_api_key: None,
            weather_api_base_url: DEFAULT_WEATHER_API_BASE_URL.to_string(),
            weather_api_timeout: 10,
            database_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert!(config.cache_enabled);
        assert_eq!(config.cache_max_entries, 1000);
        assert_eq!(config.cache_cleanup_interval, 1);
        assert_eq!(config.weather_cache_ttl, 600);
        assert_eq!(config.forecast_cache_ttl, 3600);
        assert_eq!(config.weather_api_timeout, 10);
        assert!(config.weather_api_key.is_none());
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_config_from_env() {
        // One test touches the environment so parallel tests cannot race.
        for name in [
            "SERVER_PORT",
            "CACHE_ENABLED",
            "CACHE_MAX_ENTRIES",
            "WEATHER_CACHE_TTL",
            "WEATHER_API_KEY",
            "DATABASE_URL",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert!(config.cache_enabled);
        assert_eq!(config.weather_cache_ttl, 600);
        assert!(config.database_url.is_none());

        env::set_var("CACHE_ENABLED", "false");
        env::set_var("WEATHER_CACHE_TTL", "120");
        env::set_var("SERVER_PORT", "not-a-port");
        env::set_var("WEATHER_API_KEY", "   ");

        let config = Config::from_env();
        assert!(!config.cache_enabled);
        assert_eq!(config.weather_cache_ttl, 120);
        assert_eq!(config.server_port, 3000);
        assert!(config.weather_api_key.is_none());

        for name in ["CACHE_ENABLED", "WEATHER_CACHE_TTL", "SERVER_PORT", "WEATHER_API_KEY"] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_cache_policy_uses_configured_ttls() {
        let config = Config {
            weather_cache_ttl: 30,
            forecast_cache_ttl: 90,
            ..Config::default()
        };
        let policy = config.cache_policy();
        assert_eq!(policy.weather_ttl, 30);
        assert_eq!(policy.forecast_ttl, 90);
        assert_eq!(policy.max_forecast_days, 5);
    }
}
