//! Tool registry
//!
//! Names, descriptions and JSON Schemas of the tools exposed by the API.

use std::fmt;
use std::str::FromStr;

use serde_json::json;

use crate::error::ApiError;
use crate::history::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use crate::models::requests::{DEFAULT_FORECAST_DAYS, MAX_FORECAST_DAYS, MIN_FORECAST_DAYS};
use crate::models::ToolDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    GetCurrentWeather,
    GetWeatherForecast,
    GetWeatherHistory,
    ClearCityCache,
    GetCacheStatistics,
    ClearAllCache,
}

impl ToolName {
    pub const ALL: [ToolName; 6] = [
        ToolName::GetCurrentWeather,
        ToolName::GetWeatherForecast,
        ToolName::GetWeatherHistory,
        ToolName::ClearCityCache,
        ToolName::GetCacheStatistics,
        ToolName::ClearAllCache,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::GetCurrentWeather => "get_current_weather",
            ToolName::GetWeatherForecast => "get_weather_forecast",
            ToolName::GetWeatherHistory => "get_weather_history",
            ToolName::ClearCityCache => "clear_city_cache",
            ToolName::GetCacheStatistics => "get_cache_statistics",
            ToolName::ClearAllCache => "clear_all_cache",
        }
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        let city = json!({ "type": "string", "description": "City name" });

        let (description, input_schema) = match self {
            ToolName::GetCurrentWeather => (
                "Get the current weather for a city",
                json!({
                    "type": "object",
                    "properties": { "city": city },
                    "required": ["city"]
                }),
            ),
            ToolName::GetWeatherForecast => (
                "Get the weather forecast for the coming days",
                json!({
                    "type": "object",
                    "properties": {
                        "city": city,
                        "days": {
                            "type": "integer",
                            "minimum": MIN_FORECAST_DAYS,
                            "maximum": MAX_FORECAST_DAYS,
                            "default": DEFAULT_FORECAST_DAYS,
                            "description": "Number of forecast days"
                        }
                    },
                    "required": ["city"]
                }),
            ),
            ToolName::GetWeatherHistory => (
                "Get recorded weather history for a city, newest first",
                json!({
                    "type": "object",
                    "properties": {
                        "city": city,
                        "limit": {
                            "type": "integer",
                            "minimum": 1,
                            "maximum": MAX_HISTORY_LIMIT,
                            "default": DEFAULT_HISTORY_LIMIT,
                            "description": "Number of records"
                        }
                    },
                    "required": ["city"]
                }),
            ),
            ToolName::ClearCityCache => (
                "Remove cached weather and forecasts for a city",
                json!({
                    "type": "object",
                    "properties": { "city": city },
                    "required": ["city"]
                }),
            ),
            ToolName::GetCacheStatistics => (
                "Get cache statistics",
                json!({ "type": "object", "properties": {}, "required": [] }),
            ),
            ToolName::ClearAllCache => (
                "Remove every cache entry",
                json!({ "type": "object", "properties": {}, "required": [] }),
            ),
        };

        ToolDescriptor {
            name: self.as_str(),
            description,
            input_schema,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ApiError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| ApiError::UnknownTool(name.to_string()))
    }
}

/// Descriptors for every tool, in registration order.
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    ToolName::ALL.iter().map(ToolName::descriptor).collect()
}
