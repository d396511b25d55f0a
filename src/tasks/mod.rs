//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: removes expired cache entries at configured intervals

mod expiry;

pub use expiry::spawn_expiry_task;
