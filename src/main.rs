//! Session booking backend - entry point
//!
//! Loads configuration, opens the user store, seeds the admin account and
//! serves the API.

use anyhow::{Context, Result};
use booking_backend::{
    api::{create_router, AppState},
    auth::{BcryptEncoder, JwtHandler, PasswordEncoder, UserStore},
    config::{load_env, Config},
};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::parse();
    config.validate()?;

    info!("🚀 Booking backend starting");

    let user_store = Arc::new(UserStore::new(&config.auth_db_path)?);
    let encoder = Arc::new(BcryptEncoder::new(config.bcrypt_cost));
    let jwt_handler = Arc::new(JwtHandler::new(
        &config.jwt_secret,
        config.jwt_expiration_ms,
    ));

    let admin_hash = encoder
        .encode(&config.admin_password)
        .context("Failed to hash admin password")?;
    user_store.seed_admin(&config.admin_email, admin_hash)?;

    info!("🔐 Authentication initialized at: {}", config.auth_db_path);
    info!("⏱️  Token lifetime: {}ms", jwt_handler.expiration_ms());

    let app = create_router(AppState::new(user_store, encoder, jwt_handler));

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booking_backend=debug,booking=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
