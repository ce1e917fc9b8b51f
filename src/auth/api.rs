//! Authentication API Endpoints
//! Mission: Provide login and registration endpoints

use crate::auth::{
    errors::{ApiError, AuthError},
    models::{JwtResponse, LoginRequest, MessageResponse, SignupRequest},
    service::AuthService,
};
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::info;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub service: Arc<AuthService>,
}

impl AuthState {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<JwtResponse>, ApiError> {
    info!("🔐 Login attempt: {}", payload.email);

    let service = state.service.clone();
    run_blocking(move || service.login(&payload))
        .await
        .map(Json)
        .map_err(ApiError::at(LOGIN_PATH))
}

/// Registration endpoint - POST /api/auth/register
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let service = state.service.clone();
    run_blocking(move || service.register(&payload))
        .await
        .map(Json)
        .map_err(ApiError::at(REGISTER_PATH))
}

/// bcrypt and SQLite calls block, so keep them off the async workers
async fn run_blocking<T, F>(work: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::Internal(e.into()))?
}
