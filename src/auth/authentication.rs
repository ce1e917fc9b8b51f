//! Credential checking for login.
//!
//! Unknown emails and wrong passwords are indistinguishable to the caller:
//! both come back as `BadCredentials`.

use crate::auth::{
    errors::AuthError, models::Principal, password::PasswordEncoder, principal::PrincipalLoader,
};
use std::sync::Arc;
use tracing::debug;

pub trait AuthenticationManager: Send + Sync {
    /// The authenticated principal for a matching email/password pair.
    fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError>;
}

/// Checks credentials against the stored bcrypt hash
pub struct DaoAuthenticationManager {
    loader: PrincipalLoader,
    encoder: Arc<dyn PasswordEncoder>,
}

impl DaoAuthenticationManager {
    pub fn new(loader: PrincipalLoader, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { loader, encoder }
    }
}

impl AuthenticationManager for DaoAuthenticationManager {
    fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let principal = match self.loader.load_by_username(email) {
            Ok(principal) => principal,
            Err(AuthError::PrincipalNotFound(_)) => {
                debug!("No account for {}", email);
                return Err(AuthError::BadCredentials);
            }
            Err(e) => return Err(e),
        };

        if !self.encoder.matches(password, &principal.password_hash) {
            debug!("Password mismatch for {}", email);
            return Err(AuthError::BadCredentials);
        }

        Ok(principal)
    }
}
