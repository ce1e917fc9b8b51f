//! Login and registration.
//!
//! Login: credential check, admin lookup, token issuance.
//! Registration: uniqueness check, hash, persist. No token is issued at
//! registration; the caller logs in afterwards.

use crate::auth::{
    authentication::AuthenticationManager,
    errors::AuthError,
    jwt::TokenCodec,
    models::{JwtResponse, LoginRequest, MessageResponse, NewUser, SignupRequest},
    password::PasswordEncoder,
    user_store::{DuplicateEmail, UserRepository},
};
use std::sync::Arc;
use tracing::{info, warn};

pub const REGISTERED_MESSAGE: &str = "User registered successfully!";

pub struct AuthService {
    authentication: Arc<dyn AuthenticationManager>,
    users: Arc<dyn UserRepository>,
    encoder: Arc<dyn PasswordEncoder>,
    tokens: Arc<dyn TokenCodec>,
}

impl AuthService {
    pub fn new(
        authentication: Arc<dyn AuthenticationManager>,
        users: Arc<dyn UserRepository>,
        encoder: Arc<dyn PasswordEncoder>,
        tokens: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            authentication,
            users,
            encoder,
            tokens,
        }
    }

    pub fn login(&self, request: &LoginRequest) -> Result<JwtResponse, AuthError> {
        let principal = self
            .authentication
            .authenticate(&request.email, &request.password)
            .inspect_err(|_| warn!("❌ Failed login attempt: {}", request.email))?;

        // TODO: an authenticated principal with no stored row points at a
        // store/authenticator mismatch; decide whether login should fail here.
        let admin = match self.users.find_by_email(&principal.username) {
            Ok(Some(user)) => user.admin,
            Ok(None) => {
                warn!("No stored account for authenticated {}", principal.username);
                false
            }
            Err(e) => {
                warn!("Admin lookup failed for {}: {e:#}", principal.username);
                false
            }
        };

        let token = self.tokens.issue(&principal.username)?;

        info!("✅ Login successful: {} (admin: {})", principal.username, admin);
        Ok(JwtResponse::bearer(token, &principal, admin))
    }

    pub fn register(&self, request: &SignupRequest) -> Result<MessageResponse, AuthError> {
        let request = request.normalized();
        request.validate().map_err(AuthError::Invalid)?;

        if self.users.exists_by_email(&request.email)? {
            info!("Registration refused, email in use: {}", request.email);
            return Err(AuthError::EmailTaken);
        }

        let password = self.encoder.encode(&request.password)?;
        let saved = self.users.save(NewUser {
            email: request.email.clone(),
            first_name: request.first_name,
            last_name: request.last_name,
            password,
            admin: false,
        });

        match saved {
            Ok(_) => Ok(MessageResponse::new(REGISTERED_MESSAGE)),
            // another registration for the same email committed first
            Err(e) if e.is::<DuplicateEmail>() => {
                info!("Registration refused, email taken concurrently: {}", request.email);
                Err(AuthError::EmailTaken)
            }
            Err(e) => Err(AuthError::Internal(e)),
        }
    }
}
