//! Counting fakes for the auth collaborators

use crate::auth::{
    authentication::AuthenticationManager,
    errors::{AuthError, TokenError},
    jwt::{JwtHandler, TokenCodec},
    models::{NewUser, Principal, User},
    password::PasswordEncoder,
    user_store::{DuplicateEmail, UserRepository},
};
use anyhow::{bail, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const TEST_SECRET: &str = "testSecretKeyWithMinimum512BitsRequiredForHS512Algorithm0123456789";

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

/// In-memory repository that records how often it is called
#[derive(Default)]
pub struct CountingUsers {
    users: Mutex<Vec<User>>,
    fail: bool,
    taken_on_save: Option<String>,
    find_calls: AtomicUsize,
    exists_calls: AtomicUsize,
    save_calls: AtomicUsize,
}

impl CountingUsers {
    pub fn with_user(email: &str, password_hash: &str, admin: bool) -> Self {
        let users = Self::default();
        users.users.lock().unwrap().push(User {
            id: 1,
            email: email.to_string(),
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            password: password_hash.to_string(),
            admin,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        });
        users
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `email` looks free to `exists_by_email` but is claimed by the time
    /// `save` runs.
    pub fn racing(email: &str) -> Self {
        Self {
            taken_on_save: Some(email.to_string()),
            ..Self::default()
        }
    }

    pub fn stored(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

impl UserRepository for CountingUsers {
    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        bump(&self.find_calls);
        if self.fail {
            bail!("database unavailable");
        }
        Ok(self.stored(email))
    }

    fn exists_by_email(&self, email: &str) -> Result<bool> {
        bump(&self.exists_calls);
        if self.fail {
            bail!("database unavailable");
        }
        Ok(self.stored(email).is_some())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        if self.fail {
            bail!("database unavailable");
        }
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    fn save(&self, user: NewUser) -> Result<User> {
        bump(&self.save_calls);
        if self.fail {
            bail!("database unavailable");
        }
        if self.taken_on_save.as_deref() == Some(user.email.as_str()) {
            return Err(DuplicateEmail(user.email).into());
        }
        let mut users = self.users.lock().unwrap();
        let saved = User {
            id: users.len() as i64 + 1,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password: user.password,
            admin: user.admin,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        };
        users.push(saved.clone());
        Ok(saved)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            bail!("User not found");
        }
        Ok(())
    }
}

/// Reversible stand-in for bcrypt that counts `encode` calls
#[derive(Default)]
pub struct CountingEncoder {
    encode_calls: AtomicUsize,
}

impl CountingEncoder {
    pub fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }
}

impl PasswordEncoder for CountingEncoder {
    fn encode(&self, plaintext: &str) -> Result<String> {
        bump(&self.encode_calls);
        Ok(format!("encoded:{plaintext}"))
    }

    fn matches(&self, plaintext: &str, hash: &str) -> bool {
        hash == format!("encoded:{plaintext}")
    }
}

/// Real HS512 codec with call counters
pub struct CountingCodec {
    inner: JwtHandler,
    issue_calls: AtomicUsize,
    validate_calls: AtomicUsize,
    parse_calls: AtomicUsize,
}

impl CountingCodec {
    pub fn new(expiration_ms: i64) -> Self {
        Self {
            inner: JwtHandler::new(TEST_SECRET, expiration_ms),
            issue_calls: AtomicUsize::new(0),
            validate_calls: AtomicUsize::new(0),
            parse_calls: AtomicUsize::new(0),
        }
    }

    /// Token minted outside the counters
    pub fn mint(&self, subject: &str) -> String {
        self.inner.issue(subject).unwrap()
    }

    pub fn issue_calls(&self) -> usize {
        self.issue_calls.load(Ordering::SeqCst)
    }

    pub fn validate_calls(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }

    pub fn parse_calls(&self) -> usize {
        self.parse_calls.load(Ordering::SeqCst)
    }
}

impl TokenCodec for CountingCodec {
    fn issue(&self, subject: &str) -> Result<String, TokenError> {
        bump(&self.issue_calls);
        self.inner.issue(subject)
    }

    fn validate(&self, token: &str) -> bool {
        bump(&self.validate_calls);
        self.inner.validate(token)
    }

    fn parse_subject(&self, token: &str) -> Result<String, TokenError> {
        bump(&self.parse_calls);
        self.inner.parse_subject(token)
    }
}

/// Authentication manager that accepts exactly one email/password pair
pub struct FixedAuthentication {
    principal: Principal,
    password: String,
}

impl FixedAuthentication {
    pub fn accepting(principal: Principal, password: &str) -> Self {
        Self {
            principal,
            password: password.to_string(),
        }
    }
}

impl AuthenticationManager for FixedAuthentication {
    fn authenticate(&self, email: &str, password: &str) -> std::result::Result<Principal, AuthError> {
        if email == self.principal.username && password == self.password {
            Ok(self.principal.clone())
        } else {
            Err(AuthError::BadCredentials)
        }
    }
}

pub fn principal(id: i64, username: &str) -> Principal {
    Principal {
        id,
        username: username.to_string(),
        first_name: "Prénom".to_string(),
        last_name: "Nom".to_string(),
        password_hash: "encoded:password".to_string(),
        admin: false,
    }
}
