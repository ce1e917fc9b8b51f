//! Principal loading: username (email) to full identity record.

use crate::auth::{errors::AuthError, models::Principal, user_store::UserRepository};
use std::sync::Arc;

#[derive(Clone)]
pub struct PrincipalLoader {
    users: Arc<dyn UserRepository>,
}

impl PrincipalLoader {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// One repository lookup per call. A missing account is a hard error.
    pub fn load_by_username(&self, username: &str) -> Result<Principal, AuthError> {
        self.users
            .find_by_email(username)?
            .map(|user| Principal::from_user(&user))
            .ok_or_else(|| AuthError::PrincipalNotFound(username.to_string()))
    }
}
