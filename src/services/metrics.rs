//! Metrics collection and Prometheus integration service.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::time::{Duration, Instant};

/// Route label of the scrape endpoint, excluded from request metrics
pub const METRICS_ROUTE: &str = "/metrics";

/// Application metrics collector for Prometheus integration
#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub http_requests_in_progress: IntGauge,
    pub app_uptime_seconds: Gauge,
    pub app_info: CounterVec,
    pub weather_forecasts_generated_total: IntCounter,
    pub banana_analytics_requests_total: IntCounterVec,
    pub rate_limit_rejections_total: IntCounterVec,
    pub security_blocked_requests_total: IntCounterVec,
    pub start_time: Instant,
}

impl AppMetrics {
    /// Create a new metrics collector on its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // HTTP request counter by method, status, and route
        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?;

        let http_requests_in_progress = IntGauge::new(
            "http_requests_in_progress",
            "Number of HTTP requests currently being served",
        )?;

        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        let app_info = CounterVec::new(
            Opts::new("app_info", "Application information"),
            &["version", "commit", "build_time"],
        )?;

        let weather_forecasts_generated_total = IntCounter::new(
            "weather_forecasts_generated_total",
            "Total number of forecast entries generated",
        )?;

        let banana_analytics_requests_total = IntCounterVec::new(
            Opts::new(
                "banana_analytics_requests_total",
                "Total number of banana analytics queries by operation",
            ),
            &["operation"],
        )?;

        let rate_limit_rejections_total = IntCounterVec::new(
            Opts::new(
                "rate_limit_rejections_total",
                "Requests rejected by a rate limiting policy",
            ),
            &["policy"],
        )?;

        let security_blocked_requests_total = IntCounterVec::new(
            Opts::new(
                "security_blocked_requests_total",
                "Requests rejected by the malicious content scan",
            ),
            &["source"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_progress.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;
        registry.register(Box::new(app_info.clone()))?;
        registry.register(Box::new(weather_forecasts_generated_total.clone()))?;
        registry.register(Box::new(banana_analytics_requests_total.clone()))?;
        registry.register(Box::new(rate_limit_rejections_total.clone()))?;
        registry.register(Box::new(security_blocked_requests_total.clone()))?;

        app_info
            .with_label_values(&[
                env!("CARGO_PKG_VERSION"),
                env!("VERGEN_GIT_SHA"),
                env!("VERGEN_BUILD_TIMESTAMP"),
            ])
            .inc();

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_progress,
            app_uptime_seconds,
            app_info,
            weather_forecasts_generated_total,
            banana_analytics_requests_total,
            rate_limit_rejections_total,
            security_blocked_requests_total,
            start_time: Instant::now(),
        })
    }

    /// Record an HTTP request with method, route, status, and duration
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        if route == METRICS_ROUTE {
            return;
        }

        self.http_requests_total
            .with_label_values(&[method, &status.to_string(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    pub fn request_started(&self) {
        self.http_requests_in_progress.inc();
    }

    pub fn request_finished(&self) {
        self.http_requests_in_progress.dec();
    }

    pub fn record_forecast(&self, entries: usize) {
        self.weather_forecasts_generated_total.inc_by(entries as u64);
    }

    pub fn record_analytics(&self, operation: &str) {
        self.banana_analytics_requests_total
            .with_label_values(&[operation])
            .inc();
    }

    pub fn record_rate_limit_rejection(&self, policy: &str) {
        self.rate_limit_rejections_total
            .with_label_values(&[policy])
            .inc();
    }

    pub fn record_blocked_request(&self, source: &str) {
        self.security_blocked_requests_total
            .with_label_values(&[source])
            .inc();
    }

    /// Update the application uptime gauge
    pub fn update_uptime(&self) {
        let uptime = self.start_time.elapsed().as_secs_f64();
        self.app_uptime_seconds.set(uptime);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_endpoint_is_not_recorded() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_request("GET", METRICS_ROUTE, 200, Duration::from_millis(1));
        metrics.record_request("GET", "/weatherforecast", 200, Duration::from_millis(1));

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("route=\"/weatherforecast\""));
        assert!(!rendered.contains("route=\"/metrics\""));
    }

    #[test]
    fn test_in_progress_gauge_balances() {
        let metrics = AppMetrics::new().unwrap();
        metrics.request_started();
        metrics.request_started();
        assert_eq!(metrics.http_requests_in_progress.get(), 2);
        metrics.request_finished();
        metrics.request_finished();
        assert_eq!(metrics.http_requests_in_progress.get(), 0);
    }

    #[test]
    fn test_domain_counters() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_forecast(5);
        metrics.record_analytics("summary");
        metrics.record_rate_limit_rejection("strict");
        metrics.record_blocked_request("query");

        assert_eq!(metrics.weather_forecasts_generated_total.get(), 5);
        assert_eq!(
            metrics
                .banana_analytics_requests_total
                .with_label_values(&["summary"])
                .get(),
            1
        );
        assert_eq!(
            metrics
                .rate_limit_rejections_total
                .with_label_values(&["strict"])
                .get(),
            1
        );
        assert_eq!(
            metrics
                .security_blocked_requests_total
                .with_label_values(&["query"])
                .get(),
            1
        );
    }
}
