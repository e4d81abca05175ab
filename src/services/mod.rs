//! Business logic and service layer modules.
//!
//! Forecast and analytics generators are plain functions over a random
//! number generator. Rate limiting, content scanning and metrics are shared
//! services cloned into every worker.

pub mod analytics;
pub mod content_filter;
pub mod forecast;
pub mod metrics;
pub mod rate_limit;

pub use content_filter::*;
pub use metrics::*;
pub use rate_limit::*;
