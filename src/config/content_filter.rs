//! Malicious content scanning configuration.

use super::{env_flag, env_parse};
use crate::error::StartupError;
use std::{env, fs};

/// Substrings rejected when no pattern file is configured.
///
/// Matching is case-insensitive, so entries are kept lowercase.
pub const DEFAULT_BLOCKED_PATTERNS: &[&str] = &[
    // Script injection
    "<script",
    "</script",
    "javascript:",
    "vbscript:",
    "onerror=",
    "onload=",
    "onclick=",
    "onmouseover=",
    "eval(",
    // SQL tautologies and comments
    "' or '1'='1",
    "' or 1=1",
    "\" or \"1\"=\"1",
    "'--",
    "/*",
    "; drop table",
    "union select",
    // Path traversal
    "../",
    "..\\",
];

/// Prefix marking a pattern file entry as a regular expression
pub const REGEX_PREFIX: &str = "re:";

/// Configuration for the request content scanner
#[derive(Clone, Debug)]
pub struct ContentFilterConfig {
    pub enabled: bool,
    /// Raw pattern entries; `re:`-prefixed entries are regular expressions
    pub patterns: Vec<String>,
    /// Longest offending value copied into security logs
    pub max_logged_value_len: usize,
}

impl Default for ContentFilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            patterns: DEFAULT_BLOCKED_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            max_logged_value_len: 100,
        }
    }
}

impl ContentFilterConfig {
    /// Load configuration from environment variables.
    ///
    /// Unlike the other sections this can fail: a configured pattern file
    /// that cannot be read is a startup error rather than a silent fallback
    /// to the built-in list.
    pub fn from_env() -> Result<Self, StartupError> {
        let defaults = Self::default();

        let patterns = match env::var("SECURITY_BLOCKED_PATTERNS_FILE") {
            Ok(path) => {
                let contents = fs::read_to_string(&path).map_err(|source| StartupError::Io {
                    path: path.clone(),
                    source,
                })?;
                parse_pattern_list(&contents)
            }
            Err(_) => defaults.patterns,
        };

        Ok(Self {
            enabled: env_flag("SECURITY_SCAN_ENABLED", true),
            patterns,
            max_logged_value_len: env_parse("SECURITY_LOG_MAX_VALUE_LEN")
                .unwrap_or(defaults.max_logged_value_len),
        })
    }
}

/// Parse a newline separated pattern list, skipping blanks and `#` comments
pub fn parse_pattern_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
