//! Error types shared by handlers, middleware and application startup.

use actix_web::{
    HttpResponse, ResponseError,
    http::{StatusCode, header},
};
use serde_json::json;
use thiserror::Error;

/// Request-level error surfaced to API callers.
///
/// Every variant maps onto a fixed status code and a small JSON body.
/// Internal details never leave the process: [`ApiError::Internal`] is
/// logged in full and answered with a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller-supplied data violates a documented constraint
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Request refused by the content scanner
    #[error("Request contains potentially unsafe content")]
    UnsafeContent,

    /// Request refused by a rate limiting policy
    #[error("Rate limit exceeded for policy '{policy}'")]
    RateLimited {
        policy: String,
        retry_after_seconds: u64,
    },

    /// No route matches the request
    #[error("Resource not found: {path}")]
    NotFound { path: String },

    /// Anything unexpected
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new rate limit rejection
    pub fn rate_limited<S: Into<String>>(policy: S, retry_after_seconds: u64) -> Self {
        Self::RateLimited {
            policy: policy.into(),
            retry_after_seconds,
        }
    }

    /// Create a new not found error
    pub fn not_found<S: Into<String>>(path: S) -> Self {
        Self::NotFound { path: path.into() }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::UnsafeContent => StatusCode::BAD_REQUEST,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation { message } => HttpResponse::BadRequest().json(json!({
                "error": "Bad Request",
                "message": message,
            })),
            ApiError::UnsafeContent => HttpResponse::BadRequest().json(json!({
                "error": "Bad Request",
                "message": self.to_string(),
            })),
            ApiError::RateLimited {
                retry_after_seconds,
                ..
            } => HttpResponse::TooManyRequests()
                .insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()))
                .json(json!({
                    "error": "Too Many Requests",
                    "retryAfterSeconds": retry_after_seconds,
                })),
            ApiError::NotFound { path } => HttpResponse::NotFound().json(json!({
                "error": "Not Found",
                "message": format!("No route matches {path}"),
            })),
            ApiError::Internal(detail) => {
                tracing::error!(target: "error", detail = %detail, "Unhandled error while serving request");
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal Server Error",
                    "message": "An unexpected error occurred",
                }))
            }
        }
    }
}

/// Errors that prevent the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Invalid blocked pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<StartupError> for std::io::Error {
    fn from(err: StartupError) -> Self {
        std::io::Error::other(err)
    }
}
