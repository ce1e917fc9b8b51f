//! Password hashing
//!
//! Salted one-way hashing: the same plaintext hashes differently on every call,
//! so hashes are only ever compared through `matches`.

use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use tracing::warn;

pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, plaintext: &str) -> Result<String>;
    fn matches(&self, plaintext: &str, hash: &str) -> bool;
}

/// bcrypt-backed encoder
#[derive(Debug, Clone, Copy)]
pub struct BcryptEncoder {
    cost: u32,
}

impl BcryptEncoder {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptEncoder {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordEncoder for BcryptEncoder {
    fn encode(&self, plaintext: &str) -> Result<String> {
        hash(plaintext, self.cost).context("Failed to hash password")
    }

    fn matches(&self, plaintext: &str, hash: &str) -> bool {
        match verify(plaintext, hash) {
            Ok(valid) => valid,
            Err(e) => {
                // unreadable stored hash counts as a mismatch
                warn!("Password hash could not be verified: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> BcryptEncoder {
        BcryptEncoder::new(4)
    }

    #[test]
    fn test_encode_is_salted() {
        let a = encoder().encode("password123").unwrap();
        let b = encoder().encode("password123").unwrap();

        assert_ne!(a, "password123");
        assert_ne!(a, b);
        assert!(encoder().matches("password123", &a));
        assert!(encoder().matches("password123", &b));
    }

    #[test]
    fn test_wrong_password_does_not_match() {
        let hashed = encoder().encode("password123").unwrap();
        assert!(!encoder().matches("differentpassword", &hashed));
    }

    #[test]
    fn test_garbage_hash_does_not_match() {
        assert!(!encoder().matches("password123", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_invalid_cost_fails() {
        assert!(BcryptEncoder::new(1).encode("password123").is_err());
    }
}
