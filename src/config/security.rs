//! Security headers configuration.

use super::{env_flag, env_parse};
use std::env;

/// Headers stamped onto every response by the security headers middleware
#[derive(Clone, Debug)]
pub struct SecurityHeadersConfig {
    pub csp_enabled: bool,
    pub csp_directives: String,
    pub hsts_enabled: bool,
    pub hsts_max_age: u32,
    pub frame_options: String,
    pub content_type_options: bool,
    pub xss_protection: bool,
    pub referrer_policy: String,
    pub permissions_policy: String,
}

const DEFAULT_CSP: &str = "default-src 'none'; frame-ancestors 'none'";
const DEFAULT_PERMISSIONS_POLICY: &str = "geolocation=(), microphone=(), camera=()";

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            csp_enabled: true,
            csp_directives: DEFAULT_CSP.to_string(),
            hsts_enabled: true,
            hsts_max_age: 31_536_000, // 1 year
            frame_options: "DENY".to_string(),
            content_type_options: true,
            xss_protection: true,
            referrer_policy: "strict-origin-when-cross-origin".to_string(),
            permissions_policy: DEFAULT_PERMISSIONS_POLICY.to_string(),
        }
    }
}

impl SecurityHeadersConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            csp_enabled: env_flag("SECURITY_CSP_ENABLED", true),
            csp_directives: env::var("CSP_DIRECTIVES").unwrap_or(defaults.csp_directives),
            hsts_enabled: env_flag("HSTS_ENABLED", true),
            hsts_max_age: env_parse("HSTS_MAX_AGE").unwrap_or(defaults.hsts_max_age),
            frame_options: env::var("X_FRAME_OPTIONS").unwrap_or(defaults.frame_options),
            content_type_options: env_flag("X_CONTENT_TYPE_OPTIONS", true),
            xss_protection: env_flag("X_XSS_PROTECTION", true),
            referrer_policy: env::var("REFERRER_POLICY").unwrap_or(defaults.referrer_policy),
            permissions_policy: env::var("PERMISSIONS_POLICY")
                .unwrap_or(defaults.permissions_policy),
        }
    }
}
