//! HTTP request handlers for API endpoints.
//!
//! This module contains all the HTTP request handlers that process
//! incoming requests and generate responses.

pub mod analytics;
pub mod forecast;
pub mod health;
pub mod metrics;
pub mod openapi;

pub use analytics::*;
pub use forecast::*;
pub use health::*;
pub use metrics::*;
pub use openapi::*;

use crate::{error::ApiError, utils::sanitize_for_log};
use actix_web::{
    Error, HttpRequest, HttpResponse,
    error::{PathError, QueryPayloadError},
};

/// Fallback for requests that match no route
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::not_found(req.path()))
}

/// Answer unparsable query strings with the JSON validation error
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    tracing::debug!(
        path = %req.path(),
        query = %sanitize_for_log(req.query_string(), 100),
        error = %err,
        "Rejected query string"
    );
    ApiError::validation("Query parameters are malformed or have the wrong type").into()
}

/// Answer unparsable path segments with the JSON validation error
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    tracing::debug!(
        path = %sanitize_for_log(req.path(), 100),
        error = %err,
        "Rejected path parameter"
    );
    ApiError::validation("Path parameter is malformed or has the wrong type").into()
}
