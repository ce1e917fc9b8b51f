//! Unauthorized responder
//!
//! Terminal 401 path for requests rejected because no principal is bound.
//! Unlike the identity filter, write failures here are returned to the caller.

use crate::auth::middleware::SecurityContext;
use axum::{
    body::Body,
    extract::Request,
    http::{self, header::CONTENT_TYPE, response::Parts, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::error;

/// Reason reported when a protected route is hit without a principal
pub const FULL_AUTHENTICATION_REQUIRED: &str =
    "Full authentication is required to access this resource";

/// 401 payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnauthorizedBody {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl UnauthorizedBody {
    pub fn new(path: &str, reason: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED.as_u16(),
            error: "Unauthorized".to_string(),
            message: reason.to_string(),
            path: path.to_string(),
        }
    }
}

/// Sets 401 + JSON content type on `head`, then serializes the body into `out`.
pub fn commence<W: Write>(
    head: &mut Parts,
    mut out: W,
    path: &str,
    reason: &str,
) -> std::io::Result<()> {
    error!(path, "Unauthorized error: {}", reason);

    head.status = StatusCode::UNAUTHORIZED;
    head.headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    serde_json::to_writer(&mut out, &UnauthorizedBody::new(path, reason))?;
    out.flush()
}

/// Builds the full 401 response for `path`.
pub fn unauthorized(path: &str, reason: &str) -> Response {
    let (mut head, ()) = http::Response::new(()).into_parts();
    let mut body = Vec::with_capacity(128);

    match commence(&mut head, &mut body, path, reason) {
        Ok(()) => Response::from_parts(head, Body::from(body)),
        Err(e) => {
            error!(path, "Failed to write unauthorized response: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Route layer rejecting requests whose security context holds no principal.
/// Must run inside the identity filter.
pub async fn require_authentication(req: Request, next: Next) -> Response {
    let authenticated = req
        .extensions()
        .get::<SecurityContext>()
        .is_some_and(SecurityContext::is_authenticated);

    if !authenticated {
        return unauthorized(req.uri().path(), FULL_AUTHENTICATION_REQUIRED);
    }

    next.run(req).await
}
