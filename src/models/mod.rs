//! Tool argument and response models
//!
//! Defines the DTOs (Data Transfer Objects) exchanged over the tool API.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CityArgs, ForecastArgs, HistoryArgs, DEFAULT_FORECAST_DAYS};
pub use responses::{
    ClearedAll, ClearedCity, Envelope, HealthMetrics, HealthReport, HealthStatus, ServiceHealth,
    ToolDescriptor,
};
