//! Grafana Banana API - mock weather and banana analytics behind an observable request pipeline
//!
//! The service is built with Actix Web and Paperclip and demonstrates:
//! - Mock weather forecast and banana analytics generators
//! - Fixed window rate limiting with bounded FIFO wait queues
//! - Denylist scanning of query values and request bodies
//! - Security headers and request IDs on every response
//! - Prometheus metrics and structured `tracing` logs
//! - OpenAPI documentation
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - Immutable response records and query parameters
//! - `handlers/` - HTTP request handlers for each endpoint
//! - `middleware/` - The request pipeline's cross-cutting steps
//! - `services/` - Data generators, rate limiting, content scanning, metrics
//! - `utils/` - Request inspection and log sanitisation helpers
//! - `config/` - Configuration structures and environment loading
//!
//! ## Quick Start
//!
//! ```no_run
//! use actix_web::HttpServer;
//! use grafana_banana::{AppState, create_app};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let state = AppState::from_env()?;
//!     HttpServer::new(move || create_app(state.clone()))
//!         .bind("127.0.0.1:8080")?
//!         .run()
//!         .await
//! }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use app::{AppState, create_app, create_base_app};
pub use config::{
    ContentFilterConfig, ForecastConfig, LoggingConfig, MetricsConfig, RateLimitConfig,
    RateLimitPolicy, SecurityHeadersConfig, ServerConfig,
};
pub use error::{ApiError, StartupError};
pub use handlers::{
    create_openapi_spec, get_analytics, get_metrics, get_production_by_year, get_sales_by_region,
    get_weather_forecast, health, health_live, health_ready,
};
pub use middleware::{
    ContentScan, MetricsMiddleware, RateLimit, RequestIdMiddleware, SecurityHeaders,
};
pub use models::{
    AnalyticsSummary, BananaAnalytics, ForecastEntry, ForecastQuery, HealthResponse,
    ProductionRecord, SalesQuery, SalesRecord,
};
pub use services::{
    AppMetrics, ContentFilter, FixedWindowLimiter, RateLimitDecision, RateLimiter,
};
pub use utils::{extract_client_ip, extract_route_pattern, sanitize_for_log};
