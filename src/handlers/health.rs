//! Health check endpoint handlers.

use crate::{
    models::{HealthCheck, HealthResponse},
    services::{AppMetrics, ContentFilter},
};
use actix_web::{Error, HttpRequest, HttpResponse, web};
use paperclip::actix::api_v2_operation;

/// Health check endpoint
///
/// Returns the current health status of the API. This endpoint can be used
/// by load balancers, monitoring systems, and health check probes.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the current health status of the API in JSON format.",
    tags("Health"),
    responses(
        (status = 200, description = "Successful response", body = HealthResponse)
    )
)]
pub async fn health() -> Result<web::Json<HealthResponse>, Error> {
    Ok(web::Json(HealthResponse::from_checks(vec![
        HealthCheck::healthy("self"),
    ])))
}

/// Liveness probe
///
/// Succeeds whenever the process can answer HTTP at all.
#[api_v2_operation(
    summary = "Liveness Probe",
    description = "Reports that the process is running.",
    tags("Health"),
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse)
    )
)]
pub async fn health_live() -> Result<web::Json<HealthResponse>, Error> {
    Ok(web::Json(HealthResponse::from_checks(Vec::new())))
}

fn readiness_checks(req: &HttpRequest) -> Vec<HealthCheck> {
    let metrics_check = match req.app_data::<web::Data<AppMetrics>>() {
        Some(metrics) => match metrics.render() {
            Ok(_) => HealthCheck::healthy("metrics"),
            Err(e) => HealthCheck::unhealthy("metrics", format!("Failed to render metrics: {e}")),
        },
        None => HealthCheck::unhealthy("metrics", "Metrics registry not configured".to_string()),
    };

    let filter_check = match req.app_data::<web::Data<ContentFilter>>() {
        Some(filter) if !filter.is_enabled() || filter.pattern_count() > 0 => {
            HealthCheck::healthy("content_filter")
        }
        Some(_) => HealthCheck::unhealthy(
            "content_filter",
            "Content scanning enabled with an empty pattern list".to_string(),
        ),
        None => HealthCheck::unhealthy(
            "content_filter",
            "Content filter not configured".to_string(),
        ),
    };

    vec![metrics_check, filter_check]
}

/// Readiness probe
///
/// Reports unhealthy with a 503 until the metrics registry and the content
/// filter are both in place.
#[api_v2_operation(
    summary = "Readiness Probe",
    description = "Reports whether the API is ready to serve traffic.",
    tags("Health"),
    responses(
        (status = 200, description = "Ready", body = HealthResponse),
        (status = 503, description = "Not ready", body = HealthResponse)
    )
)]
pub async fn health_ready(req: HttpRequest) -> Result<HttpResponse, Error> {
    let response = HealthResponse::from_checks(readiness_checks(&req));

    if response.is_healthy() {
        Ok(HttpResponse::Ok().json(response))
    } else {
        tracing::warn!(checks = ?response.checks, "Readiness check failed");
        Ok(HttpResponse::ServiceUnavailable().json(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().route("/health", web::get().to(health))).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let body_str = std::str::from_utf8(&body).unwrap();
        assert!(body_str.contains("healthy"));
    }

    #[actix_web::test]
    async fn test_ready_without_dependencies_is_unavailable() {
        let app =
            test::init_service(App::new().route("/health/ready", web::get().to(health_ready)))
                .await;

        let req = test::TestRequest::get().uri("/health/ready").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 503);

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["status"], "unhealthy");
    }
}
