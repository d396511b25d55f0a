//! OpenWeatherMap client.
//!
//! Talks to the 2.5 REST API (`/weather`, `/forecast`) in metric units.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ProviderError;
use crate::weather::{ForecastBundle, ForecastEntry, WeatherProvider, WeatherSample};

/// Forecast slots per day at 3-hour granularity
const SLOTS_PER_DAY: u32 = 8;
const MAX_RETRIES: u32 = 2;

// == Wire types ==
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    sys: CurrentSys,
    main: MainBlock,
    #[serde(default)]
    wind: Option<WindBlock>,
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    feels_like: f64,
    #[serde(default)]
    temp_min: Option<f64>,
    #[serde(default)]
    temp_max: Option<f64>,
    pressure: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    city: ForecastCity,
    list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
struct ForecastCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    #[serde(default)]
    dt_txt: String,
    main: MainBlock,
    #[serde(default)]
    wind: Option<WindBlock>,
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    pop: f64,
}

fn first_condition(conditions: Vec<ConditionBlock>) -> Result<ConditionBlock, ProviderError> {
    conditions
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Decode("missing weather condition".to_string()))
}

impl TryFrom<CurrentResponse> for WeatherSample {
    type Error = ProviderError;

    fn try_from(raw: CurrentResponse) -> Result<Self, Self::Error> {
        let condition = first_condition(raw.weather)?;
        let sample = WeatherSample {
            city: raw.name,
            country: raw.sys.country,
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            humidity: raw.main.humidity,
            pressure: raw.main.pressure,
            wind_speed: raw.wind.map(|w| w.speed).unwrap_or(0.0),
            description: condition.description,
            icon: condition.icon,
        };
        match sample.validate() {
            Some(problem) => Err(ProviderError::Decode(problem)),
            None => Ok(sample),
        }
    }
}

impl TryFrom<ForecastItem> for ForecastEntry {
    type Error = ProviderError;

    fn try_from(item: ForecastItem) -> Result<Self, Self::Error> {
        let condition = first_condition(item.weather)?;
        Ok(ForecastEntry {
            timestamp: item.dt,
            time_text: item.dt_txt,
            temperature: item.main.temp,
            feels_like: item.main.feels_like,
            temp_min: item.main.temp_min.unwrap_or(item.main.temp),
            temp_max: item.main.temp_max.unwrap_or(item.main.temp),
            humidity: item.main.humidity,
            pressure: item.main.pressure,
            wind_speed: item.wind.map(|w| w.speed).unwrap_or(0.0),
            description: condition.description,
            icon: condition.icon,
            precipitation_probability: item.pop,
        })
    }
}

// == Client ==
/// [`WeatherProvider`] backed by the OpenWeatherMap API.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    retry_delay: Duration,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("weather_cache/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            retry_delay: Duration::from_millis(500),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Self::new(
            config.weather_api_base_url.clone(),
            config.weather_api_key.clone(),
            Duration::from_secs(config.weather_api_timeout),
        )
    }

    /// Base delay before retrying a rate-limited request; doubles per retry.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        city: &str,
        extra: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let url = format!("{}{}", self.base_url, path);

        let mut params: Vec<(&str, String)> = vec![
            ("q", city.to_string()),
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
        ];
        params.extend(extra.iter().cloned());

        let mut delay = self.retry_delay;
        let mut attempt = 0;
        loop {
            let response = self.client.get(&url).query(&params).send().await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.bytes().await?;
                    return serde_json::from_slice(&body)
                        .map_err(|e| ProviderError::Decode(e.to_string()));
                }
                StatusCode::NOT_FOUND => return Err(ProviderError::CityNotFound(city.to_string())),
                StatusCode::TOO_MANY_REQUESTS if attempt < MAX_RETRIES => {
                    warn!(city, delay_ms = delay.as_millis() as u64, "rate limited by weather API, retrying");
                    sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                status => {
                    let message = response.text().await.unwrap_or_default();
                    return Err(ProviderError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
            }
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self, city: &str) -> Result<WeatherSample, ProviderError> {
        info!(city, "fetching current weather from provider");
        let raw: CurrentResponse = self.fetch("/weather", city, &[]).await?;
        WeatherSample::try_from(raw)
    }

    async fn forecast(&self, city: &str, days: u32) -> Result<ForecastBundle, ProviderError> {
        info!(city, days, "fetching forecast from provider");
        let cnt = (days * SLOTS_PER_DAY).to_string();
        let raw: ForecastResponse = self.fetch("/forecast", city, &[("cnt", cnt)]).await?;

        let forecasts = raw
            .list
            .into_iter()
            .map(ForecastEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForecastBundle {
            city: raw.city.name,
            country: raw.city.country,
            forecasts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_response_conversion() {
        let raw: CurrentResponse = serde_json::from_value(serde_json::json!({
            "name": "Paris",
            "sys": { "country": "FR" },
            "main": { "temp": 18.2, "feels_like": 17.5, "pressure": 1012, "humidity": 60 },
            "wind": { "speed": 4.1 },
            "weather": [{ "description": "clear sky", "icon": "01d" }]
        }))
        .unwrap();

        let sample = WeatherSample::try_from(raw).unwrap();
        assert_eq!(sample.city, "Paris");
        assert_eq!(sample.country, "FR");
        assert_eq!(sample.pressure, 1012.0);
        assert_eq!(sample.description, "clear sky");
    }

    #[test]
    fn test_missing_wind_defaults_to_calm() {
        let raw: CurrentResponse = serde_json::from_value(serde_json::json!({
            "name": "Lima",
            "sys": { "country": "PE" },
            "main": { "temp": 20.0, "feels_like": 20.0, "pressure": 1010, "humidity": 80 },
            "weather": [{ "description": "mist", "icon": "50d" }]
        }))
        .unwrap();

        assert_eq!(WeatherSample::try_from(raw).unwrap().wind_speed, 0.0);
    }

    #[test]
    fn test_empty_conditions_is_decode_error() {
        let raw: CurrentResponse = serde_json::from_value(serde_json::json!({
            "name": "Lima",
            "sys": { "country": "PE" },
            "main": { "temp": 20.0, "feels_like": 20.0, "pressure": 1010, "humidity": 80 },
            "weather": []
        }))
        .unwrap();

        assert!(matches!(WeatherSample::try_from(raw), Err(ProviderError::Decode(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let client = OpenWeatherClient::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
        let result = client.current_weather("Paris").await;
        assert!(matches!(result, Err(ProviderError::MissingApiKey)));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let client = OpenWeatherClient::new("http://x/", Some("  ".into()), Duration::from_secs(1)).unwrap();
        assert!(client.api_key.is_none());
        assert_eq!(client.base_url, "http://x");
    }
}
