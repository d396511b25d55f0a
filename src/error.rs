//! Error types for the weather service
//!
//! Provides unified error handling using thiserror. Only validation and
//! provider failures ever reach a caller; cache and persistence failures are
//! absorbed where they happen and logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Failures raised by a cache store or backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// The cache cannot be reached or is switched off
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// A value could not be encoded or decoded
    #[error("Cache serialization failed: {0}")]
    Serialization(String),

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Key or value rejected by the store
    #[error("Invalid cache request: {0}")]
    InvalidRequest(String),

    /// Cache is full and eviction failed
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// Anything else, including malformed key patterns
    #[error("Internal cache error: {0}")]
    Internal(String),
}

// == Provider Error Enum ==
/// Failures raised by the upstream weather provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("weather API key is not configured")]
    MissingApiKey,

    #[error("city not found: {0}")]
    CityNotFound(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected weather API payload: {0}")]
    Decode(String),
}

// == Persistence Error Enum ==
/// Failures raised by the history store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored history row is invalid: {0}")]
    Decode(String),
}

// == Weather Error Enum ==
/// Request-scoped error type for weather queries.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Bad input: empty city, out-of-range days or limit
    #[error("{0}")]
    Validation(String),

    /// Upstream weather source failure
    #[error("failed to fetch weather data for {city}: {source}")]
    Provider {
        city: String,
        #[source]
        source: ProviderError,
    },

    #[error("failed to access weather history: {0}")]
    Persistence(#[from] PersistenceError),
}

impl WeatherError {
    /// Wraps a provider failure with the city it was raised for.
    pub fn provider(city: impl Into<String>, source: ProviderError) -> Self {
        WeatherError::Provider {
            city: city.into(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        WeatherError::Validation(message.into())
    }
}

// == API Error Enum ==
/// Errors produced by the HTTP tool adapter itself.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Tool {0} not found")]
    UnknownTool(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnknownTool(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for weather queries.
pub type Result<T> = std::result::Result<T, WeatherError>;
