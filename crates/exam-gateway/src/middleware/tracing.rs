//! Request tracing middleware.
//!
//! Every request runs inside an `api_request` span carrying a request id.
//! The id is taken from an incoming `x-request-id` header when present,
//! otherwise a UUID v7 is generated, and it is echoed on the response.

use super::REQUEST_ID_HEADER;
use axum::{
    body::Body,
    http::{HeaderValue, Request},
    response::Response,
};
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::{info, info_span, Instrument, Span};
use uuid::Uuid;

/// Longest client-supplied request id that is reused as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Tracing layer that creates spans for each request
#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

/// Tracing service
#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        let request_id = request_id(&req);
        let span = info_span!(
            "api_request",
            http.method = %req.method(),
            http.target = %req.uri().path(),
            request_id = %request_id.to_str().unwrap_or_default(),
            http.status_code = tracing::field::Empty,
        );

        Box::pin(
            async move {
                let started = Instant::now();
                let result = inner.call(req).await;

                result.map(|mut response| {
                    let status = response.status();
                    Span::current().record("http.status_code", status.as_u16());
                    info!(
                        status = status.as_u16(),
                        latency_ms = started.elapsed().as_millis() as u64,
                        "Request completed"
                    );
                    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
                    response
                })
            }
            .instrument(span),
        )
    }
}

/// Reuse a sane client-supplied id, otherwise mint a fresh one.
fn request_id<B>(req: &Request<B>) -> HeaderValue {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN && v.to_str().is_ok())
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::now_v7().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}
