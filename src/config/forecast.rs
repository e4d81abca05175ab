//! Weather forecast endpoint limits.

use super::env_parse;

/// Bounds applied to the `days` query parameter of `/weatherforecast`
#[derive(Clone, Debug)]
pub struct ForecastConfig {
    pub default_days: u32,
    pub max_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_days: 5,
            max_days: 365,
        }
    }
}

impl ForecastConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_days = env_parse("FORECAST_MAX_DAYS").unwrap_or(defaults.max_days);
        let default_days = env_parse("FORECAST_DEFAULT_DAYS")
            .unwrap_or(defaults.default_days)
            .min(max_days);

        Self {
            default_days,
            max_days,
        }
    }
}
