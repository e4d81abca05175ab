use actix_web::{http::StatusCode, test};
use grafana_banana::{AppState, RateLimitConfig, RateLimitPolicy, create_app};
use std::time::{Duration, Instant};

fn config_with(global: RateLimitPolicy, api: RateLimitPolicy, strict: RateLimitPolicy) -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        global,
        api,
        strict,
    }
}

fn tight_strict_config() -> RateLimitConfig {
    config_with(
        RateLimitPolicy::new("global", 100, 60, 0),
        RateLimitPolicy::new("api", 50, 60, 0),
        RateLimitPolicy::new("strict", 2, 60, 0),
    )
}

#[actix_web::test]
async fn test_strict_policy_rejects_after_limit() {
    let state = AppState::with_rate_limits(tight_strict_config()).unwrap();
    let app = test::init_service(create_app(state)).await;

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/api/analytics/production/2024")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/analytics/production/2024")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = resp
        .headers()
        .get("retry-after")
        .expect("Retry-After header should be present")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));

    // Rejections still carry the security headers and a request id
    assert_eq!(resp.headers().get("x-content-type-options").unwrap(), "nosniff");
    assert!(resp.headers().contains_key("x-request-id"));

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["error"], "Too Many Requests");
    assert_eq!(json["retryAfterSeconds"].as_u64(), Some(retry_after));
}

#[actix_web::test]
async fn test_strict_limit_is_shared_by_strict_routes() {
    let state = AppState::with_rate_limits(tight_strict_config()).unwrap();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/api/analytics/production/2024")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/analytics/sales").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/analytics/sales").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );

    // The api policy is untouched by strict exhaustion
    let req = test::TestRequest::get().uri("/weatherforecast").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_clients_are_limited_independently() {
    let state = AppState::with_rate_limits(tight_strict_config()).unwrap();
    let app = test::init_service(create_app(state)).await;

    let call = |ip: &'static str| {
        test::TestRequest::get()
            .uri("/api/analytics/sales")
            .insert_header(("X-Forwarded-For", ip))
            .to_request()
    };

    for _ in 0..2 {
        assert_eq!(
            test::call_service(&app, call("203.0.113.1")).await.status(),
            StatusCode::OK
        );
    }
    assert_eq!(
        test::call_service(&app, call("203.0.113.1")).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );

    assert_eq!(
        test::call_service(&app, call("203.0.113.2")).await.status(),
        StatusCode::OK
    );
}

#[actix_web::test]
async fn test_health_and_metrics_are_exempt() {
    let config = config_with(
        RateLimitPolicy::new("global", 1, 60, 0),
        RateLimitPolicy::new("api", 1, 60, 0),
        RateLimitPolicy::new("strict", 1, 60, 0),
    );
    let state = AppState::with_rate_limits(config).unwrap();
    let app = test::init_service(create_app(state)).await;

    for _ in 0..5 {
        for uri in ["/health", "/health/ready", "/health/live", "/metrics"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        }
    }

    // The global permit is still available for a regular route
    let req = test::TestRequest::get().uri("/weatherforecast").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/weatherforecast").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[actix_web::test]
async fn test_rejections_are_counted_by_policy() {
    let state = AppState::with_rate_limits(tight_strict_config()).unwrap();
    let app = test::init_service(create_app(state)).await;

    for _ in 0..3 {
        let req = test::TestRequest::get().uri("/api/analytics/sales").to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let body_str = std::str::from_utf8(&body).unwrap();
    assert!(body_str.contains("rate_limit_rejections_total{policy=\"strict\"} 1"));
}

#[actix_web::test]
async fn test_queued_request_waits_for_next_window() {
    let config = config_with(
        RateLimitPolicy::new("global", 100, 60, 0),
        RateLimitPolicy::new("api", 1, 1, 1),
        RateLimitPolicy::new("strict", 10, 60, 0),
    );
    let state = AppState::with_rate_limits(config).unwrap();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/weatherforecast").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let started = Instant::now();
    let req = test::TestRequest::get().uri("/weatherforecast").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(started.elapsed() >= Duration::from_millis(500));
}

#[actix_web::test]
async fn test_disabled_rate_limiting_admits_everything() {
    let mut config = tight_strict_config();
    config.enabled = false;
    let state = AppState::with_rate_limits(config).unwrap();
    let app = test::init_service(create_app(state)).await;

    for _ in 0..10 {
        let req = test::TestRequest::get().uri("/api/analytics/sales").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
