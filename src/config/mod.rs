//! Configuration structures and loading utilities.
//!
//! Every section follows the same shape: a plain struct with `Default`
//! values and a `from_env()` constructor that falls back to those defaults
//! when a variable is missing or does not parse.

pub mod content_filter;
pub mod forecast;
pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod security;
pub mod server;

pub use content_filter::*;
pub use forecast::*;
pub use logging::*;
pub use metrics::*;
pub use rate_limit::*;
pub use security::*;
pub use server::*;

use std::{env, str::FromStr};

/// Read and parse an environment variable, `None` when unset or unparsable
pub(crate) fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Read a boolean flag, accepting `true`/`false` in any case
pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
