//! Request logging middleware.
//!
//! Logs every HTTP request with method, path, status code, latency and the
//! caller's identity. Runs inside the identity filter so the context is bound.

use crate::auth::middleware::{extract_context, SecurityContext};
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

const ANONYMOUS: &str = "anonymous";

pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Skip logging for health checks to reduce noise
    if path == "/health" {
        return next.run(request).await;
    }

    let user = extract_context(&request)
        .and_then(SecurityContext::principal)
        .map(|p| p.username.clone())
        .unwrap_or_else(|| ANONYMOUS.to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    if status >= 500 {
        warn!(
            method = %method,
            path = %path,
            status,
            latency_ms,
            user = %user,
            "Request failed (5xx)"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status,
            latency_ms,
            user = %user,
            "Request completed"
        );
    }

    response
}
