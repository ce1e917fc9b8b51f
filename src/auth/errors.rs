//! Authentication error types
//!
//! `TokenError` never leaves the codec as anything but a boolean on the
//! validation path. `AuthError` is what the endpoint logic and principal
//! loading surface; `ApiError` pins it to a request path for the HTTP layer.

use crate::auth::{entry_point, models::MessageResponse};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

/// Why a token was rejected
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token is expired")]
    Expired,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User Not Found with email: {0}")]
    PrincipalNotFound(String),

    #[error("Bad credentials")]
    BadCredentials,

    #[error("Error: Email is already taken!")]
    EmailTaken,

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("internal failure: {0:#}")]
    Internal(#[from] anyhow::Error),
}

/// An `AuthError` raised while serving `path`
#[derive(Debug)]
pub struct ApiError {
    pub error: AuthError,
    pub path: String,
}

impl ApiError {
    pub fn at(path: &str) -> impl FnOnce(AuthError) -> ApiError + '_ {
        move |error| ApiError {
            error,
            path: path.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.error {
            AuthError::BadCredentials | AuthError::PrincipalNotFound(_) => {
                entry_point::unauthorized(&self.path, &AuthError::BadCredentials.to_string())
            }
            AuthError::EmailTaken | AuthError::Invalid(_) => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new(self.error.to_string())),
            )
                .into_response(),
            AuthError::Token(e) => {
                error!(path = %self.path, "Token issuance failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            AuthError::Internal(e) => {
                error!(path = %self.path, "Internal failure: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
