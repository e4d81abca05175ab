//! Metrics configuration.

use super::env_flag;

/// Configuration for Prometheus metrics collection and exposition
#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// When false, `/metrics` answers 503 instead of the exposition text
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("METRICS_ENABLED", true),
        }
    }
}
