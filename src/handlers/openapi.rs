//! OpenAPI specification for the API.

use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Grafana Banana API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Mock weather forecast and banana analytics API instrumented for Prometheus and Grafana.\n\n\
                ## Request pipeline\n\
                Every request passes, in order, through:\n\
                1. Security header injection\n\
                2. Rate limiting per client IP (`global` 100/min, `api` 50/min, `strict` 10/min, each with a small FIFO wait queue)\n\
                3. Malicious content scanning of query values and structured request bodies\n\
                \n\
                ## Error responses\n\
                - `400` `{\"error\", \"message\"}` for invalid input or blocked content\n\
                - `429` `{\"error\", \"retryAfterSeconds\"}` with a `Retry-After` header when rate limited\n\
                - `404` for unknown routes\n\
                - `500` with a generic message; details are logged server side only\n\
                \n\
                ## Observability\n\
                - `GET /metrics` exposes Prometheus metrics\n\
                - `GET /health`, `/health/ready` and `/health/live` report service health\n\
                - Every response carries an `X-Request-ID` header".into()
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}
