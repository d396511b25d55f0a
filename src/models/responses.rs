//! Response models
//!
//! The uniform tool envelope, the health report and tool descriptors.

use serde::Serialize;
use serde_json::Value;

/// Uniform result of a tool invocation.
///
/// Tool-level failures are carried here with `success: false`; the HTTP
/// status stays 200.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    /// Set when the call succeeded but a side effect (history write) failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            cached: None,
            warning: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            cached: None,
            warning: None,
        }
    }

    pub fn with_cached(mut self, cached: bool) -> Self {
        self.cached = Some(cached);
        self
    }

    pub fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }
}

/// Payload of `clear_city_cache`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClearedCity {
    pub city: String,
    pub removed_keys: usize,
}

/// Payload of `clear_all_cache`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClearedAll {
    pub cleared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceHealth {
    pub cache: bool,
    pub database: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthMetrics {
    pub cached_weather_keys: usize,
}

/// Response body for GET /health
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    pub services: ServiceHealth,
    pub metrics: HealthMetrics,
}

impl HealthReport {
    /// Only a database failure makes the service unhealthy.
    pub fn new(cache: bool, database: bool, cached_weather_keys: usize) -> Self {
        let status = if database {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };
        Self {
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
            services: ServiceHealth { cache, database },
            metrics: HealthMetrics {
                cached_weather_keys,
            },
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Entry of the GET /tools listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}
