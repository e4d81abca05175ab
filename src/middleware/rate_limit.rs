//! Rate limiting middleware.

use crate::{
    error::ApiError,
    middleware::RequestId,
    services::{AppMetrics, RateLimiter},
    utils::{extract_client_ip, sanitize_for_log},
};
use actix_web::{
    Error,
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
};

/// Rate limiting middleware factory.
///
/// Applies every policy guarding the request path, keyed by client IP.
/// Requests that land in a wait queue are held until their window opens;
/// requests that find both permits and queue exhausted get a 429.
pub struct RateLimit {
    limiter: RateLimiter,
}

impl RateLimit {
    pub fn new(limiter: RateLimiter) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

/// The actual rate limiting middleware service
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: RateLimiter,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limiter = self.limiter.clone();

        Box::pin(async move {
            let client_ip = extract_client_ip(req.request());

            match limiter.acquire(&client_ip, req.path()) {
                Ok(None) => {}
                Ok(Some(wait)) => {
                    tracing::debug!(
                        target: "rate_limit",
                        client_ip = %sanitize_for_log(&client_ip, 64),
                        wait_ms = %wait.as_millis(),
                        "Request queued until next rate limit window"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err) => {
                    if let ApiError::RateLimited {
                        policy,
                        retry_after_seconds,
                    } = &err
                    {
                        tracing::warn!(
                            target: "security",
                            request_id = ?RequestId::of(req.request()),
                            client_ip = %sanitize_for_log(&client_ip, 64),
                            path = %sanitize_for_log(req.path(), 100),
                            policy = %policy,
                            retry_after_seconds = *retry_after_seconds,
                            "Rate limit exceeded"
                        );
                        if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
                            metrics.record_rate_limit_rejection(policy);
                        }
                    }
                    return Ok(req.error_response(err));
                }
            }

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_boxed_body)
        })
    }
}
