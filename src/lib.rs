//! Weather Cache - cache-aside weather query service
//!
//! Serves current weather and forecasts through a TTL cache in front of a
//! weather provider, records observed samples in a history store, and
//! exposes everything as invocable tools over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod tasks;
pub mod weather;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{Result, WeatherError};
pub use tasks::spawn_expiry_task;
pub use weather::WeatherService;
