//! Data models and schemas for the Grafana Banana API.
//!
//! Forecast and analytics records are immutable values built per request
//! and dropped once serialized.

pub mod analytics;
pub mod api;
pub mod forecast;

pub use analytics::*;
pub use api::*;
pub use forecast::*;
