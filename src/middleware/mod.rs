//! Custom middleware implementations for the API.
//!
//! Registered so that requests pass through, outermost first: metrics,
//! request id, security headers, rate limiting, content scanning.

pub mod content_filter;
pub mod metrics;
pub mod rate_limit;
pub mod request_id;
pub mod security;

pub use content_filter::*;
pub use metrics::*;
pub use rate_limit::*;
pub use request_id::*;
pub use security::*;
