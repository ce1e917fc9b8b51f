//! Authentication Models
//! Mission: Define the identity records and auth wire payloads

use serde::{Deserialize, Serialize};

/// Stored user account, as persisted by the user store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password: String, // bcrypt hash - never serialize
    pub admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Account data for a user that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub admin: bool,
}

/// Authenticated identity resolved from a token subject or a credential check.
///
/// Two principals are the same identity when their ids match, whatever the
/// other fields say.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub admin: bool,
}

impl Principal {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password_hash: user.password.clone(),
            admin: user.admin,
        }
    }
}

impl PartialEq for Principal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Principal {}

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (email)
    pub iat: i64,    // issued at, seconds
    pub exp: i64,    // expiration, seconds
}

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body. Missing fields deserialize empty and are
/// reported by `validate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl SignupRequest {
    /// Email and names with surrounding whitespace stripped
    pub fn normalized(&self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            password: self.password.clone(),
        }
    }

    /// Field constraints checked before any lookup. Returns the first violation.
    pub fn validate(&self) -> Result<(), String> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Error: Email is required!".to_string());
        }
        if email.chars().count() > 50 || !email.contains('@') {
            return Err("Error: Email is invalid!".to_string());
        }
        if !(3..=20).contains(&self.first_name.trim().chars().count()) {
            return Err("Error: First name must be between 3 and 20 characters!".to_string());
        }
        if !(3..=20).contains(&self.last_name.trim().chars().count()) {
            return Err("Error: Last name must be between 3 and 20 characters!".to_string());
        }
        if !(6..=40).contains(&self.password.chars().count()) {
            return Err("Error: Password must be between 6 and 40 characters!".to_string());
        }
        Ok(())
    }
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub admin: bool,
}

impl JwtResponse {
    pub fn bearer(token: String, principal: &Principal, admin: bool) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            id: principal.id,
            username: principal.username.clone(),
            first_name: principal.first_name.clone(),
            last_name: principal.last_name.clone(),
            admin,
        }
    }
}

/// Plain `{message}` body used for registration outcomes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// User response (sanitized)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            admin: user.admin,
            created_at: user.created_at.clone(),
            updated_at: user.updated_at.clone(),
        }
    }
}
