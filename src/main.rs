use actix_web::HttpServer;
use grafana_banana::{AppState, LoggingConfig, ServerConfig, create_app};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    LoggingConfig::from_env().init();

    let server_config = ServerConfig::from_env();
    let state = AppState::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Failed to build application state");
    })?;

    tracing::info!(
        bind_address = %server_config.bind_address,
        version = env!("CARGO_PKG_VERSION"),
        blocked_patterns = state.content_filter.pattern_count(),
        rate_limiting = state.rate_limiter.is_enabled(),
        "Starting Grafana Banana API"
    );

    HttpServer::new(move || create_app(state.clone()))
        .bind(&server_config.bind_address)?
        .run()
        .await
}
