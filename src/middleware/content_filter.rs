//! Malicious content scanning middleware.

use crate::{
    error::ApiError,
    middleware::RequestId,
    services::{AppMetrics, ContentFilter, is_scannable_content_type},
    utils::extract_client_ip,
};
use actix_web::{
    Error,
    body::{BoxBody, MessageBody},
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::CONTENT_TYPE,
    web,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
};

/// Content scanning middleware factory.
///
/// Checks every query key and value, plus the body of structured
/// requests, against the configured denylist. A single hit refuses the
/// whole request with a generic 400; nothing is redacted or passed on.
pub struct ContentScan {
    filter: ContentFilter,
}

impl ContentScan {
    pub fn new(filter: ContentFilter) -> Self {
        Self { filter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ContentScan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ContentScanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ContentScanMiddleware {
            service: Rc::new(service),
            filter: self.filter.clone(),
        }))
    }
}

/// The actual content scanning middleware service
pub struct ContentScanMiddleware<S> {
    service: Rc<S>,
    filter: ContentFilter,
}

impl<S, B> Service<ServiceRequest> for ContentScanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let filter = self.filter.clone();

        Box::pin(async move {
            let mut req = req;

            if filter.is_enabled() {
                let mut violation = filter.scan_query(req.query_string()).err();

                if violation.is_none() {
                    let content_type = req
                        .headers()
                        .get(CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();

                    if is_scannable_content_type(&content_type) {
                        // Oversized or broken bodies are answered here, not propagated
                        let body = match req.extract::<web::Bytes>().await {
                            Ok(body) => body,
                            Err(e) => return Ok(req.error_response(e)),
                        };
                        violation = filter.scan_body(&content_type, &body).err();
                        // Hand the buffered body back to the handler
                        req.set_payload(Payload::from(body));
                    }
                }

                if let Some(violation) = violation {
                    tracing::warn!(
                        target: "security",
                        request_id = ?RequestId::of(req.request()),
                        client_ip = %extract_client_ip(req.request()),
                        method = %req.method(),
                        path = %req.path(),
                        source = %violation.source,
                        pattern = %violation.pattern,
                        value = %violation.sanitized_value,
                        "Blocked request containing potentially malicious content"
                    );
                    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
                        metrics.record_blocked_request(violation.source.as_str());
                    }
                    return Ok(req.error_response(ApiError::UnsafeContent));
                }
            }

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_boxed_body)
        })
    }
}
