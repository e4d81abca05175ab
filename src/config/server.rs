//! HTTP server binding configuration.

use super::env_parse;
use std::{env, path::Path};

/// Where the HTTP server listens
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// `BIND_ADDRESS` wins outright. Otherwise containers bind all
    /// interfaces and local development binds loopback, both on `PORT`.
    pub fn from_env() -> Self {
        let port = env_parse::<u16>("PORT").unwrap_or(8080);

        let bind_address = resolve_bind_address(
            env::var("BIND_ADDRESS").ok().as_deref(),
            is_container_environment(
                env::var("KUBERNETES_SERVICE_HOST").ok().as_deref(),
                env::var("DOCKER_CONTAINER").ok().as_deref(),
                Path::new("/.dockerenv").exists(),
            ),
            port,
        );

        Self { bind_address }
    }
}

/// Whether the process appears to run inside Kubernetes or Docker
pub fn is_container_environment(
    k8s_service_host: Option<&str>,
    docker_container: Option<&str>,
    dockerenv_exists: bool,
) -> bool {
    k8s_service_host.is_some() || docker_container.is_some() || dockerenv_exists
}

/// Pick the listen address from an explicit override or the environment kind
pub fn resolve_bind_address(bind_override: Option<&str>, in_container: bool, port: u16) -> String {
    if let Some(bind) = bind_override.filter(|b| !b.trim().is_empty()) {
        return bind.trim().to_string();
    }

    if in_container {
        format!("0.0.0.0:{port}")
    } else {
        format!("127.0.0.1:{port}")
    }
}
