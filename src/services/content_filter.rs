//! Denylist scanning of query strings and request bodies.

use crate::{
    config::{ContentFilterConfig, REGEX_PREFIX},
    error::StartupError,
    utils::sanitize_for_log,
};
use actix_web::web;
use regex::{Regex, RegexBuilder};
use std::{fmt, sync::Arc};

/// Where an offending value was found
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanSource {
    Query,
    Body,
}

impl ScanSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanSource::Query => "query",
            ScanSource::Body => "body",
        }
    }
}

impl fmt::Display for ScanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A blocked value, already sanitised for logging
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentViolation {
    pub source: ScanSource,
    pub pattern: String,
    pub sanitized_value: String,
}

/// Case-insensitive substring and regex matcher
#[derive(Debug)]
pub struct PatternMatcher {
    substrings: Vec<String>,
    regexes: Vec<Regex>,
}

impl PatternMatcher {
    /// Compile pattern entries; `re:`-prefixed entries are regular expressions
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, StartupError> {
        let mut substrings = Vec::new();
        let mut regexes = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            match pattern.strip_prefix(REGEX_PREFIX) {
                Some(expr) => {
                    let regex = RegexBuilder::new(expr)
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| StartupError::Pattern {
                            pattern: pattern.to_string(),
                            source,
                        })?;
                    regexes.push(regex);
                }
                None if !pattern.is_empty() => substrings.push(pattern.to_lowercase()),
                None => {}
            }
        }

        Ok(Self {
            substrings,
            regexes,
        })
    }

    /// First pattern matching `value`, if any
    pub fn find_match(&self, value: &str) -> Option<&str> {
        let lowered = value.to_lowercase();

        self.substrings
            .iter()
            .find(|s| lowered.contains(s.as_str()))
            .map(String::as_str)
            .or_else(|| {
                self.regexes
                    .iter()
                    .find(|re| re.is_match(value))
                    .map(Regex::as_str)
            })
    }

    pub fn len(&self) -> usize {
        self.substrings.len() + self.regexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether a request body with this content type carries structured data
pub fn is_scannable_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/x-www-form-urlencoded"
        || mime == "text/plain"
        || mime.ends_with("/json")
        || mime.ends_with("+json")
        || mime.ends_with("/xml")
        || mime.ends_with("+xml")
}

/// Shared request scanner
#[derive(Clone, Debug)]
pub struct ContentFilter {
    enabled: bool,
    max_logged_value_len: usize,
    matcher: Arc<PatternMatcher>,
}

impl ContentFilter {
    pub fn new(config: &ContentFilterConfig) -> Result<Self, StartupError> {
        Ok(Self {
            enabled: config.enabled,
            max_logged_value_len: config.max_logged_value_len,
            matcher: Arc::new(PatternMatcher::new(&config.patterns)?),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pattern_count(&self) -> usize {
        self.matcher.len()
    }

    fn check(&self, source: ScanSource, value: &str) -> Result<(), ContentViolation> {
        match self.matcher.find_match(value) {
            Some(pattern) => Err(ContentViolation {
                source,
                pattern: pattern.to_string(),
                sanitized_value: sanitize_for_log(value, self.max_logged_value_len),
            }),
            None => Ok(()),
        }
    }

    /// Check each URL-encoded key and value on its own.
    ///
    /// Pairs are decoded first; when decoding fails the raw keys and values
    /// are checked instead.
    fn check_urlencoded(&self, source: ScanSource, encoded: &str) -> Result<(), ContentViolation> {
        match web::Query::<Vec<(String, String)>>::from_query(encoded) {
            Ok(pairs) => {
                for (key, value) in pairs.iter() {
                    self.check(source, key)?;
                    self.check(source, value)?;
                }
            }
            Err(_) => {
                for pair in encoded.split('&') {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    self.check(source, key)?;
                    self.check(source, value)?;
                }
            }
        }

        Ok(())
    }

    /// Scan every query key and value
    pub fn scan_query(&self, query_string: &str) -> Result<(), ContentViolation> {
        if !self.enabled || query_string.is_empty() {
            return Ok(());
        }
        self.check_urlencoded(ScanSource::Query, query_string)
    }

    /// Scan a raw body if its content type indicates structured data
    pub fn scan_body(&self, content_type: &str, body: &[u8]) -> Result<(), ContentViolation> {
        if !self.enabled || body.is_empty() || !is_scannable_content_type(content_type) {
            return Ok(());
        }

        let text = String::from_utf8_lossy(body);
        if content_type
            .to_ascii_lowercase()
            .starts_with("application/x-www-form-urlencoded")
        {
            self.check_urlencoded(ScanSource::Body, &text)
        } else {
            self.check(ScanSource::Body, &text)
        }
    }
}
