//! Health check response models.

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_UNHEALTHY: &str = "unhealthy";

/// Outcome of one named health check
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl HealthCheck {
    pub fn healthy(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: STATUS_HEALTHY.to_string(),
            description: None,
        }
    }

    pub fn unhealthy(name: &str, description: String) -> Self {
        Self {
            name: name.to_string(),
            status: STATUS_UNHEALTHY.to_string(),
            description: Some(description),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == STATUS_HEALTHY
    }
}

/// Response model for the health endpoints
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub commit: String,
    pub timestamp: DateTime<Utc>,
    pub checks: Vec<HealthCheck>,
}

impl HealthResponse {
    /// Aggregate checks; the response is healthy only if every check is
    pub fn from_checks(checks: Vec<HealthCheck>) -> Self {
        let status = if checks.iter().all(HealthCheck::is_healthy) {
            STATUS_HEALTHY
        } else {
            STATUS_UNHEALTHY
        };

        Self {
            status: status.to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: env!("VERGEN_GIT_SHA").to_string(),
            timestamp: Utc::now(),
            checks,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == STATUS_HEALTHY
    }
}
