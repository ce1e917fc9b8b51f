//! Authentication Middleware
//! Mission: Resolve the caller's identity from a bearer token on every request
//!
//! The filter never rejects a request. When anything goes wrong the request
//! continues with an anonymous context and route-level checks decide.

use crate::auth::{
    errors::AuthError, jwt::TokenCodec, models::Principal, principal::PrincipalLoader,
};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, error};

const BEARER_PREFIX: &str = "Bearer ";

/// Request-scoped identity. Lives in the request extensions and is dropped
/// with the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityContext {
    principal: Option<Principal>,
}

impl SecurityContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}

/// Token from an `Authorization: Bearer <token>` header, if present
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
}

pub struct IdentityFilter {
    tokens: Arc<dyn TokenCodec>,
    loader: PrincipalLoader,
}

impl IdentityFilter {
    pub fn new(tokens: Arc<dyn TokenCodec>, loader: PrincipalLoader) -> Self {
        Self { tokens, loader }
    }

    /// Security context for a request with these headers. Never fails.
    pub fn resolve(&self, headers: &HeaderMap) -> SecurityContext {
        match self.authenticate(headers) {
            Ok(Some(principal)) => SecurityContext::authenticated(principal),
            Ok(None) => SecurityContext::anonymous(),
            Err(e) => {
                error!("Cannot set user authentication: {e}");
                SecurityContext::anonymous()
            }
        }
    }

    /// At most one validation and one principal lookup
    fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Principal>, AuthError> {
        let Some(token) = bearer_token(headers) else {
            return Ok(None);
        };

        if !self.tokens.validate(token) {
            debug!("Bearer token rejected, continuing anonymously");
            return Ok(None);
        }

        let username = self.tokens.parse_subject(token)?;
        let principal = self.loader.load_by_username(&username)?;
        Ok(Some(principal))
    }
}

/// Binds a `SecurityContext` to every request, then runs the rest of the
/// pipeline exactly once.
pub async fn identity_filter(
    State(filter): State<Arc<IdentityFilter>>,
    mut req: Request,
    next: Next,
) -> Response {
    let headers = req.headers().clone();
    let context = tokio::task::spawn_blocking(move || filter.resolve(&headers))
        .await
        .unwrap_or_else(|e| {
            error!("Identity resolution task failed: {e}");
            SecurityContext::anonymous()
        });
    req.extensions_mut().insert(context);
    next.run(req).await
}

/// Extract the security context from request (use after identity filter)
pub fn extract_context(req: &Request) -> Option<&SecurityContext> {
    req.extensions().get::<SecurityContext>()
}
