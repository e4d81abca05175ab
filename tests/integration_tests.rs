use actix_web::{http::StatusCode, test};
use grafana_banana::{AppState, RateLimitConfig, create_app, create_base_app};

/// Integration test for the health check endpoint
///
/// Runs against the complete application configuration so the middleware
/// stack, OpenAPI wrapper and shared state are all in play.
#[actix_web::test]
async fn test_health_endpoint_integration() {
    let app = test::init_service(create_base_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK, "Expected 200 OK status");

    let content_type = resp.headers().get("content-type");
    assert!(content_type.is_some(), "Content-Type header should be present");
    let content_type_str = content_type.unwrap().to_str().unwrap();
    assert!(
        content_type_str.contains("application/json"),
        "Expected JSON content type, got: {}",
        content_type_str
    );

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "grafana-banana");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["timestamp"].is_string());
}

#[actix_web::test]
async fn test_readiness_and_liveness_probes() {
    let app = test::init_service(create_base_app()).await;

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    let checks = json["checks"].as_array().unwrap();
    assert!(checks.iter().any(|c| c["name"] == "metrics"));
    assert!(checks.iter().any(|c| c["name"] == "content_filter"));

    let req = test::TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["status"], "healthy");
}

#[actix_web::test]
async fn test_security_headers_on_every_response() {
    let app = test::init_service(create_base_app()).await;

    for uri in ["/health", "/weatherforecast", "/does-not-exist"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let headers = resp.headers();

        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff", "{uri}");
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY", "{uri}");
        assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block", "{uri}");
        assert!(headers.contains_key("referrer-policy"), "{uri}");
        assert!(headers.contains_key("permissions-policy"), "{uri}");
        assert!(headers.contains_key("content-security-policy"), "{uri}");
        assert!(headers.contains_key("strict-transport-security"), "{uri}");
    }
}

#[actix_web::test]
async fn test_request_id_is_generated_or_echoed() {
    let app = test::init_service(create_base_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    let generated = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-request-id", "trace-1234"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-1234");
}

#[actix_web::test]
async fn test_unknown_route_returns_json_not_found() {
    let app = test::init_service(create_base_app()).await;

    let req = test::TestRequest::get().uri("/api/nothing-here").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["error"], "Not Found");
}

#[actix_web::test]
async fn test_metrics_endpoint_integration() {
    let state = AppState::with_rate_limits(RateLimitConfig::default()).unwrap();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/weatherforecast").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/analytics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.contains("text/plain"));

    let body = test::read_body(resp).await;
    let body_str = std::str::from_utf8(&body).unwrap();

    assert!(body_str.contains("http_requests_total"));
    assert!(body_str.contains("route=\"/weatherforecast\""));
    assert!(body_str.contains("http_request_duration_seconds"));
    assert!(body_str.contains("http_requests_in_progress"));
    assert!(body_str.contains("app_uptime_seconds"));
    assert!(body_str.contains("app_info"));
    assert!(body_str.contains("weather_forecasts_generated_total 5"));
    assert!(body_str.contains("banana_analytics_requests_total{operation=\"summary\"} 1"));
    assert!(!body_str.contains("route=\"/metrics\""));
}

#[actix_web::test]
async fn test_openapi_spec_lists_routes() {
    let app = test::init_service(create_base_app()).await;

    let req = test::TestRequest::get().uri("/api/spec/v2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["info"]["title"], "Grafana Banana API");

    let paths = json["paths"].as_object().unwrap();
    for path in [
        "/weatherforecast",
        "/api/analytics",
        "/api/analytics/sales",
        "/health",
        "/health/ready",
        "/health/live",
        "/metrics",
    ] {
        assert!(paths.contains_key(path), "missing {path} in OpenAPI spec");
    }
}
