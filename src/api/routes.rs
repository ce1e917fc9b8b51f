use axum::{middleware, response::Json, routing::get, routing::post, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::user::{self, UserState};
use crate::auth::{
    api::{self as auth_api, AuthState, LOGIN_PATH, REGISTER_PATH},
    entry_point::require_authentication,
    identity_filter, AuthService, DaoAuthenticationManager, IdentityFilter, PasswordEncoder,
    PrincipalLoader, TokenCodec, UserRepository,
};
use crate::middleware::request_logging;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub users: UserState,
    pub filter: Arc<IdentityFilter>,
}

impl AppState {
    /// Wire every auth component around one repository, encoder and codec.
    pub fn new(
        users: Arc<dyn UserRepository>,
        encoder: Arc<dyn PasswordEncoder>,
        tokens: Arc<dyn TokenCodec>,
    ) -> Self {
        let loader = PrincipalLoader::new(users.clone());
        let authentication = Arc::new(DaoAuthenticationManager::new(
            loader.clone(),
            encoder.clone(),
        ));
        let service = Arc::new(AuthService::new(
            authentication,
            users.clone(),
            encoder,
            tokens.clone(),
        ));

        Self {
            auth: AuthState::new(service),
            users: UserState { users },
            filter: Arc::new(IdentityFilter::new(tokens, loader)),
        }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let auth_router = Router::new()
        .route(LOGIN_PATH, post(auth_api::login))
        .route(REGISTER_PATH, post(auth_api::register))
        .with_state(state.auth);

    // Everything here needs a bound principal
    let protected_routes = Router::new()
        .route("/api/user/:id", get(user::find_by_id).delete(user::delete))
        .route_layer(middleware::from_fn(require_authentication))
        .with_state(state.users);

    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(auth_router)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn_with_state(state.filter, identity_filter))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ===== Route Handlers =====

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
