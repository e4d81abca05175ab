//! Utility functions and helper modules.
//!
//! Request inspection helpers and log sanitisation.

pub mod http;
pub mod route;
pub mod sanitize;

pub use http::*;
pub use route::*;
pub use sanitize::*;
