//! API Module
//!
//! HTTP adapter exposing the weather tools.
//!
//! # Endpoints
//! - `GET /tools` - Tool listing
//! - `POST /tools/:name` - Tool invocation
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;
pub mod tools;

pub use handlers::AppState;
pub use routes::create_router;
pub use tools::{tool_descriptors, ToolName};
