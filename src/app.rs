//! Application state and app factory.

use crate::{
    config::{
        ContentFilterConfig, ForecastConfig, MetricsConfig, RateLimitConfig,
        SecurityHeadersConfig,
    },
    error::StartupError,
    handlers::{
        create_openapi_spec, get_analytics, get_metrics, get_production_by_year,
        get_sales_by_region, get_weather_forecast, health, health_live, health_ready, not_found,
        path_error_handler, query_error_handler,
    },
    middleware::{ContentScan, MetricsMiddleware, RateLimit, RequestIdMiddleware, SecurityHeaders},
    services::{AppMetrics, ContentFilter, RateLimiter},
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};

/// Everything the app shares across workers.
///
/// Build once and clone into each worker's app so rate limit counters and
/// metrics are process-wide rather than per worker.
#[derive(Clone)]
pub struct AppState {
    pub forecast: ForecastConfig,
    pub metrics_config: MetricsConfig,
    pub security_headers: SecurityHeadersConfig,
    pub metrics: AppMetrics,
    pub rate_limiter: RateLimiter,
    pub content_filter: ContentFilter,
}

impl AppState {
    /// Assemble state from explicit configuration sections
    pub fn new(
        rate_limit: RateLimitConfig,
        content_filter: &ContentFilterConfig,
        security_headers: SecurityHeadersConfig,
        metrics_config: MetricsConfig,
        forecast: ForecastConfig,
    ) -> Result<Self, StartupError> {
        for policy in rate_limit.policies() {
            tracing::info!(
                policy = %policy.name,
                enabled = rate_limit.enabled,
                permit_limit = policy.permit_limit,
                window_seconds = policy.window_seconds,
                queue_limit = policy.queue_limit,
                "Rate limit policy configured"
            );
        }

        Ok(Self {
            forecast,
            metrics_config,
            security_headers,
            metrics: AppMetrics::new()?,
            rate_limiter: RateLimiter::new(rate_limit),
            content_filter: ContentFilter::new(content_filter)?,
        })
    }

    /// Assemble state from environment variables
    pub fn from_env() -> Result<Self, StartupError> {
        Self::new(
            RateLimitConfig::from_env(),
            &ContentFilterConfig::from_env()?,
            SecurityHeadersConfig::from_env(),
            MetricsConfig::from_env(),
            ForecastConfig::from_env(),
        )
    }

    /// Default configuration with a custom rate limit configuration
    pub fn with_rate_limits(rate_limit: RateLimitConfig) -> Result<Self, StartupError> {
        Self::new(
            rate_limit,
            &ContentFilterConfig::default(),
            SecurityHeadersConfig::default(),
            MetricsConfig::default(),
            ForecastConfig::default(),
        )
    }
}

/// Creates the app over shared state
///
/// Middleware runs, outermost first: metrics, request id, security
/// headers, rate limiting, content scanning, then route dispatch.
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(ContentScan::new(state.content_filter.clone()))
        .wrap(RateLimit::new(state.rate_limiter.clone()))
        .wrap(SecurityHeaders::new(state.security_headers.clone()))
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(state.forecast))
        .app_data(web::Data::new(state.metrics_config))
        .app_data(web::Data::new(state.metrics))
        .app_data(web::Data::new(state.rate_limiter))
        .app_data(web::Data::new(state.content_filter))
        .app_data(actix_web::web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(actix_web::web::PathConfig::default().error_handler(path_error_handler))
        .service(web::resource("/weatherforecast").route(web::get().to(get_weather_forecast)))
        .service(web::resource("/api/analytics").route(web::get().to(get_analytics)))
        .service(
            web::resource("/api/analytics/production/{year}")
                .route(web::get().to(get_production_by_year)),
        )
        .service(web::resource("/api/analytics/sales").route(web::get().to(get_sales_by_region)))
        .service(web::resource("/metrics").route(web::get().to(get_metrics)))
        .service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/health/ready").route(web::get().to(health_ready)))
        .service(web::resource("/health/live").route(web::get().to(health_live)))
        .with_json_spec_at("/api/spec/v2")
        .build()
        .default_service(actix_web::web::to(not_found))
}

/// Creates an app configured from the environment
///
/// Convenient for tests; the server binary builds [`AppState`] once and
/// shares it between workers instead.
///
/// # Panics
///
/// Panics if the environment describes an invalid configuration.
pub fn create_base_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = AppState::from_env().expect("Failed to build application state");
    create_app(state)
}
