//! API Handlers
//!
//! One handler per tool, plus the HTTP endpoints that list, dispatch and
//! health-check them. Tool handlers never fail at the HTTP level: every
//! outcome is an [`Envelope`].

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::tools::{tool_descriptors, ToolName};
use crate::cache::CacheBackend;
use crate::config::Config;
use crate::error::{ApiError, WeatherError};
use crate::history::{HistoryRecord, HistoryStore};
use crate::models::{
    CityArgs, ClearedAll, ClearedCity, Envelope, ForecastArgs, HealthReport, HistoryArgs,
    ToolDescriptor,
};
use crate::weather::{
    CacheStatistics, ForecastBundle, WeatherProvider, WeatherSample, WeatherService,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: WeatherService,
    pub history: Arc<dyn HistoryStore>,
}

impl AppState {
    pub fn new(service: WeatherService, history: Arc<dyn HistoryStore>) -> Self {
        Self { service, history }
    }

    /// Wires the service from its parts using the configured cache policy.
    pub fn from_parts(
        config: &Config,
        cache: Arc<dyn CacheBackend>,
        provider: Arc<dyn WeatherProvider>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        let service = WeatherService::new(cache, provider, config.cache_policy());
        Self::new(service, history)
    }
}

fn failure<T, E: ToString>(tool: ToolName, error: E) -> Envelope<T> {
    let message = error.to_string();
    warn!(tool = %tool, error = %message, "tool call failed");
    Envelope::failure(message)
}

// == Tool handlers ==

/// Current weather for a city. Every success is recorded in the history;
/// a failed history write becomes a warning on an otherwise successful result.
pub async fn get_current_weather(state: &AppState, args: CityArgs) -> Envelope<WeatherSample> {
    let lookup = match state.service.get_current_weather(&args.city).await {
        Ok(lookup) => lookup,
        Err(e) => return failure(ToolName::GetCurrentWeather, e),
    };

    let cached = lookup.from_cache();
    let warning = match state.history.save_sample(&lookup.value).await {
        Ok(record) => {
            debug!(city = %record.sample.city, id = record.id, "sample recorded");
            None
        }
        Err(e) => {
            warn!(city = %lookup.value.city, error = %e, "failed to record weather sample");
            Some(format!("weather history not saved: {e}"))
        }
    };

    Envelope::ok(lookup.into_inner())
        .with_cached(cached)
        .with_warning(warning)
}

pub async fn get_weather_forecast(state: &AppState, args: ForecastArgs) -> Envelope<ForecastBundle> {
    let days = match args.validate() {
        Ok(days) => days,
        Err(message) => return failure(ToolName::GetWeatherForecast, message),
    };

    match state.service.get_weather_forecast(&args.city, days).await {
        Ok(lookup) => {
            let cached = lookup.from_cache();
            Envelope::ok(lookup.into_inner()).with_cached(cached)
        }
        Err(e) => failure(ToolName::GetWeatherForecast, e),
    }
}

pub async fn get_weather_history(state: &AppState, args: HistoryArgs) -> Envelope<Vec<HistoryRecord>> {
    let limit = match args.validate() {
        Ok(limit) => limit,
        Err(message) => return failure(ToolName::GetWeatherHistory, message),
    };
    let city = args.city.trim();

    match state.history.get_history(city, limit).await {
        Ok(records) => {
            info!(city, limit, count = records.len(), "weather history retrieved");
            Envelope::ok(records)
        }
        Err(e) => failure(ToolName::GetWeatherHistory, WeatherError::from(e)),
    }
}

pub async fn clear_city_cache(state: &AppState, args: CityArgs) -> Envelope<ClearedCity> {
    match state.service.clear_cache_for_city(&args.city).await {
        Ok(removed_keys) => Envelope::ok(ClearedCity {
            city: args.city.trim().to_string(),
            removed_keys,
        }),
        Err(e) => failure(ToolName::ClearCityCache, e),
    }
}

pub async fn get_cache_statistics(state: &AppState) -> Envelope<CacheStatistics> {
    Envelope::ok(state.service.get_cache_statistics().await)
}

pub async fn clear_all_cache(state: &AppState) -> Envelope<ClearedAll> {
    if state.service.clear_all_cache().await {
        Envelope::ok(ClearedAll { cleared: true })
    } else {
        failure(ToolName::ClearAllCache, "cache is unavailable")
    }
}

/// Aggregated health of the cache and the history store.
pub async fn health_check(state: &AppState) -> HealthReport {
    let cache = state.service.cache_healthy().await;
    let database = state.history.health_check().await;
    let cached_weather_keys = if cache {
        state.service.cached_weather_count().await
    } else {
        0
    };
    HealthReport::new(cache, database, cached_weather_keys)
}

// == HTTP endpoints ==

/// Handler for GET /tools
pub async fn list_tools_handler() -> Json<Vec<ToolDescriptor>> {
    Json(tool_descriptors())
}

/// Handler for POST /tools/:name
///
/// The body is an optional JSON object of arguments; an empty body means no
/// arguments.
pub async fn call_tool_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let tool: ToolName = name.parse()?;
    debug!(tool = %tool, "tool call");

    let args = match parse_body(&body) {
        Ok(args) => args,
        Err(message) => return Ok(respond(failure::<(), _>(tool, message))),
    };

    let response = match tool {
        ToolName::GetCurrentWeather => match parse_args::<CityArgs>(args) {
            Ok(args) => respond(get_current_weather(&state, args).await),
            Err(message) => respond(failure::<(), _>(tool, message)),
        },
        ToolName::GetWeatherForecast => match parse_args::<ForecastArgs>(args) {
            Ok(args) => respond(get_weather_forecast(&state, args).await),
            Err(message) => respond(failure::<(), _>(tool, message)),
        },
        ToolName::GetWeatherHistory => match parse_args::<HistoryArgs>(args) {
            Ok(args) => respond(get_weather_history(&state, args).await),
            Err(message) => respond(failure::<(), _>(tool, message)),
        },
        ToolName::ClearCityCache => match parse_args::<CityArgs>(args) {
            Ok(args) => respond(clear_city_cache(&state, args).await),
            Err(message) => respond(failure::<(), _>(tool, message)),
        },
        ToolName::GetCacheStatistics => respond(get_cache_statistics(&state).await),
        ToolName::ClearAllCache => respond(clear_all_cache(&state).await),
    };

    Ok(response)
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = health_check(&state).await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

fn respond<T: Serialize>(envelope: Envelope<T>) -> Response {
    Json(envelope).into_response()
}

fn parse_body(body: &[u8]) -> Result<Value, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => Ok(Value::Object(Default::default())),
        Ok(args @ Value::Object(_)) => Ok(args),
        Ok(_) => Err("Tool arguments must be a JSON object".to_string()),
        Err(e) => Err(format!("Invalid tool arguments: {e}")),
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("Invalid tool arguments: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{DisabledCache, MemoryCache};
    use crate::error::{PersistenceError, ProviderError};
    use crate::history::MemoryHistoryStore;
    use async_trait::async_trait;

    struct FixedProvider;

    #[async_trait]
    impl WeatherProvider for FixedProvider {
        async fn current_weather(&self, city: &str) -> Result<WeatherSample, ProviderError> {
            Ok(WeatherSample {
                city: city.to_string(),
                country: "FR".to_string(),
                temperature: 21.0,
                feels_like: 20.4,
                humidity: 40,
                pressure: 1018.0,
                wind_speed: 3.0,
                description: "few clouds".to_string(),
                icon: "02d".to_string(),
            })
        }

        async fn forecast(&self, city: &str, _days: u32) -> Result<ForecastBundle, ProviderError> {
            Ok(ForecastBundle {
                city: city.to_string(),
                country: "FR".to_string(),
                forecasts: vec![],
            })
        }
    }

    /// History store whose database is always down
    struct BrokenHistory;

    #[async_trait]
    impl HistoryStore for BrokenHistory {
        async fn save_sample(&self, _sample: &WeatherSample) -> Result<HistoryRecord, PersistenceError> {
            Err(PersistenceError::Decode("disk full".to_string()))
        }

        async fn get_history(&self, _city: &str, _limit: u32) -> Result<Vec<HistoryRecord>, PersistenceError> {
            Err(PersistenceError::Decode("disk full".to_string()))
        }

        async fn health_check(&self) -> bool {
            false
        }
    }

    fn state(cache: Arc<dyn CacheBackend>, history: Arc<dyn HistoryStore>) -> AppState {
        AppState::from_parts(&Config::default(), cache, Arc::new(FixedProvider), history)
    }

    fn memory_state() -> AppState {
        state(
            Arc::new(MemoryCache::new(100, 300)),
            Arc::new(MemoryHistoryStore::new()),
        )
    }

    fn city(name: &str) -> CityArgs {
        CityArgs {
            city: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_current_weather_reports_cached_flag() {
        let state = memory_state();

        let first = get_current_weather(&state, city("Paris")).await;
        let second = get_current_weather(&state, city("Paris")).await;

        assert!(first.success);
        assert_eq!(first.cached, Some(false));
        assert_eq!(second.cached, Some(true));
        assert_eq!(first.data, second.data);
    }

    #[tokio::test]
    async fn test_every_success_is_recorded() {
        let state = memory_state();

        get_current_weather(&state, city("Paris")).await;
        get_current_weather(&state, city("Paris")).await;

        let history = get_weather_history(
            &state,
            HistoryArgs {
                city: "paris".to_string(),
                limit: 10,
            },
        )
        .await;
        assert_eq!(history.data.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_history_failure_is_a_warning() {
        let state = state(Arc::new(MemoryCache::new(100, 300)), Arc::new(BrokenHistory));

        let envelope = get_current_weather(&state, city("Paris")).await;

        assert!(envelope.success);
        assert!(envelope.data.is_some());
        assert!(envelope.warning.unwrap().contains("disk full"));
    }

    #[tokio::test]
    async fn test_empty_city_fails_envelope() {
        let envelope = get_current_weather(&memory_state(), city("  ")).await;

        assert!(!envelope.success);
        assert_eq!(
            envelope.error.as_deref(),
            Some("City parameter is required and cannot be empty")
        );
    }

    #[tokio::test]
    async fn test_forecast_days_out_of_range() {
        let envelope = get_weather_forecast(
            &memory_state(),
            ForecastArgs {
                city: "Paris".to_string(),
                days: 9,
            },
        )
        .await;

        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("days"));
    }

    #[tokio::test]
    async fn test_unavailable_cache_still_succeeds() {
        let state = state(Arc::new(DisabledCache), Arc::new(MemoryHistoryStore::new()));

        let envelope = get_current_weather(&state, city("Paris")).await;

        assert!(envelope.success);
        assert_eq!(envelope.cached, Some(false));
        assert!(!clear_all_cache(&state).await.success);
    }

    #[tokio::test]
    async fn test_health_depends_on_database_only() {
        let healthy = health_check(&state(Arc::new(DisabledCache), Arc::new(MemoryHistoryStore::new()))).await;
        assert!(healthy.is_healthy());
        assert!(!healthy.services.cache);

        let unhealthy = health_check(&state(Arc::new(MemoryCache::new(10, 60)), Arc::new(BrokenHistory))).await;
        assert!(!unhealthy.is_healthy());
    }

    #[tokio::test]
    async fn test_clear_city_cache_counts_keys() {
        let state = memory_state();
        get_current_weather(&state, city("Oslo")).await;

        let envelope = clear_city_cache(&state, city(" Oslo ")).await;

        assert_eq!(
            envelope.data,
            Some(ClearedCity {
                city: "Oslo".to_string(),
                removed_keys: 1
            })
        );
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b"").unwrap(), serde_json::json!({}));
        assert_eq!(parse_body(b"null").unwrap(), serde_json::json!({}));
        assert!(parse_body(b"[1]").is_err());
        assert!(parse_body(b"{oops").is_err());
    }
}
