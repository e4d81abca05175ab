use actix_web::{http::StatusCode, test};
use grafana_banana::{
    AppState, ContentFilterConfig, ForecastConfig, MetricsConfig, RateLimitConfig,
    SecurityHeadersConfig, create_app, create_base_app,
};

async fn assert_blocked(resp: actix_web::dev::ServiceResponse) {
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers().get("x-content-type-options").unwrap(), "nosniff");

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["error"], "Bad Request");
    assert_eq!(
        json["message"],
        "Request contains potentially unsafe content"
    );
}

#[actix_web::test]
async fn test_script_tag_in_query_is_blocked() {
    let app = test::init_service(create_base_app()).await;

    let req = test::TestRequest::get()
        .uri("/weatherforecast?q=%3Cscript%3Ealert(1)%3C%2Fscript%3E")
        .to_request();
    assert_blocked(test::call_service(&app, req).await).await;
}

#[actix_web::test]
async fn test_sql_injection_is_blocked_regardless_of_case() {
    let app = test::init_service(create_base_app()).await;

    for query in [
        "region=%27%20OR%20%271%27%3D%271",
        "region=%27%20or%20%271%27%3D%271",
        "region=x%3B%20DROP%20TABLE%20users",
    ] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/analytics/sales?{query}"))
            .to_request();
        assert_blocked(test::call_service(&app, req).await).await;
    }
}

#[actix_web::test]
async fn test_json_body_is_scanned_before_dispatch() {
    let app = test::init_service(create_base_app()).await;

    let req = test::TestRequest::post()
        .uri("/weatherforecast")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"note":"<SCRIPT>alert(1)</SCRIPT>"}"#)
        .to_request();
    assert_blocked(test::call_service(&app, req).await).await;

    // A clean body is forwarded; the route only accepts GET
    let req = test::TestRequest::post()
        .uri("/weatherforecast")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"note":"ripe bananas"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_ne!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_clean_requests_pass_through() {
    let app = test::init_service(create_base_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/analytics/sales?region=north-america")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_blocked_requests_are_counted() {
    let state = AppState::with_rate_limits(RateLimitConfig::default()).unwrap();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/weatherforecast?next=javascript:alert(1)")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    let body = test::read_body(resp).await;
    let body_str = std::str::from_utf8(&body).unwrap();
    assert!(body_str.contains("security_blocked_requests_total{source=\"query\"} 1"));
}

#[actix_web::test]
async fn test_custom_patterns_replace_defaults() {
    let filter = ContentFilterConfig {
        patterns: vec!["re:bad(word|phrase)".to_string()],
        ..ContentFilterConfig::default()
    };
    let state = AppState::new(
        RateLimitConfig::default(),
        &filter,
        SecurityHeadersConfig::default(),
        MetricsConfig::default(),
        ForecastConfig::default(),
    )
    .unwrap();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/weatherforecast?note=BadPhrase")
        .to_request();
    assert_blocked(test::call_service(&app, req).await).await;

    let req = test::TestRequest::get()
        .uri("/weatherforecast?note=%3Cscript%3E")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_oversized_body_keeps_pipeline_headers() {
    let state = AppState::with_rate_limits(RateLimitConfig::default()).unwrap();
    let app = test::init_service(create_app(state)).await;

    let body = format!(r#"{{"note":"{}"}}"#, "a".repeat(300 * 1024));
    let req = test::TestRequest::post()
        .uri("/weatherforecast")
        .insert_header(("content-type", "application/json"))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(resp.headers().get("x-content-type-options").unwrap(), "nosniff");
    assert!(resp.headers().contains_key("x-request-id"));

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let body_str = std::str::from_utf8(&body).unwrap();
    assert!(body_str.contains("status=\"413\""));
}
