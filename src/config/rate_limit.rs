//! Rate limiting configuration.

use super::{env_flag, env_parse};

/// Name of the policy applied to every rate limited request
pub const GLOBAL_POLICY: &str = "global";
/// Name of the policy applied to the general API surface
pub const API_POLICY: &str = "api";
/// Name of the policy applied to the expensive analytics queries
pub const STRICT_POLICY: &str = "strict";

/// Longest accepted window; one day
pub const MAX_WINDOW_SECONDS: u64 = 86_400;

/// A single fixed window policy with a bounded wait queue
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub name: String,
    /// Requests admitted per window
    pub permit_limit: usize,
    pub window_seconds: u64,
    /// Requests allowed to wait for the next window once permits run out
    pub queue_limit: usize,
}

impl RateLimitPolicy {
    pub fn new(name: &str, permit_limit: usize, window_seconds: u64, queue_limit: usize) -> Self {
        Self {
            name: name.to_string(),
            permit_limit,
            window_seconds,
            queue_limit,
        }
    }

    /// Load a policy from `RATE_LIMIT_{NAME}_{PERMITS,WINDOW,QUEUE}`
    fn from_env(default: Self) -> Self {
        let prefix = format!("RATE_LIMIT_{}", default.name.to_uppercase());

        let permit_limit = env_parse(&format!("{prefix}_PERMITS")).unwrap_or(default.permit_limit);
        let window_seconds = env_parse::<u64>(&format!("{prefix}_WINDOW"))
            .filter(|w| *w > 0)
            .map(|w| w.min(MAX_WINDOW_SECONDS))
            .unwrap_or(default.window_seconds);
        let queue_limit = env_parse(&format!("{prefix}_QUEUE")).unwrap_or(default.queue_limit);

        Self {
            permit_limit,
            window_seconds,
            queue_limit,
            ..default
        }
    }
}

/// Configuration for the three named rate limiting policies
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub global: RateLimitPolicy,
    pub api: RateLimitPolicy,
    pub strict: RateLimitPolicy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            global: RateLimitPolicy::new(GLOBAL_POLICY, 100, 60, 10),
            api: RateLimitPolicy::new(API_POLICY, 50, 60, 5),
            strict: RateLimitPolicy::new(STRICT_POLICY, 10, 60, 2),
        }
    }
}

impl RateLimitConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            enabled: env_flag("RATE_LIMIT_ENABLED", true),
            global: RateLimitPolicy::from_env(defaults.global),
            api: RateLimitPolicy::from_env(defaults.api),
            strict: RateLimitPolicy::from_env(defaults.strict),
        }
    }

    /// All policies, global first
    pub fn policies(&self) -> [&RateLimitPolicy; 3] {
        [&self.global, &self.api, &self.strict]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::ENV_MUTEX;
    use std::env;

    #[test]
    fn test_rate_limit_defaults() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.global, RateLimitPolicy::new("global", 100, 60, 10));
        assert_eq!(config.api, RateLimitPolicy::new("api", 50, 60, 5));
        assert_eq!(config.strict, RateLimitPolicy::new("strict", 10, 60, 2));
    }

    #[test]
    fn test_rate_limit_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var("RATE_LIMIT_STRICT_PERMITS", "3");
            env::set_var("RATE_LIMIT_STRICT_QUEUE", "0");
            env::set_var("RATE_LIMIT_API_WINDOW", "0");
            env::set_var("RATE_LIMIT_ENABLED", "FALSE");
        }

        let config = RateLimitConfig::from_env();
        assert!(!config.enabled);
        assert_eq!(config.strict.permit_limit, 3);
        assert_eq!(config.strict.queue_limit, 0);
        assert_eq!(config.strict.window_seconds, 60);
        // A zero-length window is ignored
        assert_eq!(config.api.window_seconds, 60);

        unsafe {
            env::remove_var("RATE_LIMIT_STRICT_PERMITS");
            env::remove_var("RATE_LIMIT_STRICT_QUEUE");
            env::remove_var("RATE_LIMIT_API_WINDOW");
            env::remove_var("RATE_LIMIT_ENABLED");
        }
    }

    #[test]
    fn test_policies_listed_global_first() {
        let config = RateLimitConfig::default();
        let names: Vec<&str> = config.policies().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, [GLOBAL_POLICY, API_POLICY, STRICT_POLICY]);
    }

    #[test]
    fn test_oversized_window_is_capped() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var("RATE_LIMIT_GLOBAL_WINDOW", u64::MAX.to_string());
        }

        let config = RateLimitConfig::from_env();
        assert_eq!(config.global.window_seconds, MAX_WINDOW_SECONDS);

        unsafe {
            env::remove_var("RATE_LIMIT_GLOBAL_WINDOW");
        }
    }
}
