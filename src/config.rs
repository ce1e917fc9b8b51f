//! Runtime configuration, from flags or environment (`.env` files included).

use anyhow::{ensure, Result};
use clap::Parser;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Parser, Debug, Clone)]
#[command(name = "booking")]
#[command(about = "Session booking backend - authentication and identity API")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// SQLite file holding user accounts
    #[arg(long, env = "AUTH_DB_PATH", default_value = "booking_auth.db")]
    pub auth_db_path: String,

    /// HMAC secret for signing tokens
    #[arg(
        long,
        env = "JWT_SECRET",
        hide_env_values = true,
        default_value = "dev-secret-change-in-production-minimum-64-characters-for-hs512-signing"
    )]
    pub jwt_secret: String,

    /// Token lifetime in milliseconds. Negative values issue pre-expired tokens.
    #[arg(
        long,
        env = "JWT_EXPIRATION_MS",
        default_value_t = 86_400_000,
        allow_negative_numbers = true
    )]
    pub jwt_expiration_ms: i64,

    /// bcrypt work factor
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    /// Admin account created on first start
    #[arg(long, env = "ADMIN_EMAIL", default_value = "yoga@studio.com")]
    pub admin_email: String,

    #[arg(
        long,
        env = "ADMIN_PASSWORD",
        hide_env_values = true,
        default_value = "test!1234"
    )]
    pub admin_password: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.jwt_secret.trim().is_empty(), "JWT_SECRET must not be empty");
        ensure!(
            (4..=31).contains(&self.bcrypt_cost),
            "BCRYPT_COST must be between 4 and 31, got {}",
            self.bcrypt_cost
        );
        ensure!(!self.admin_email.trim().is_empty(), "ADMIN_EMAIL must not be empty");
        Ok(())
    }
}

pub fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate's own .env when launched from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_expiration_accepted() {
        let config =
            Config::try_parse_from(["booking", "--jwt-expiration-ms", "-60000"]).unwrap();
        assert_eq!(config.jwt_expiration_ms, -60_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::try_parse_from([
            "booking",
            "--bind-addr",
            "127.0.0.1:9000",
            "--jwt-secret",
            "s3cret",
            "--bcrypt-cost",
            "6",
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.bcrypt_cost, 6);
    }

    #[test]
    fn test_blank_secret_rejected() {
        let config = Config::try_parse_from(["booking", "--jwt-secret", "  "]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_cost_rejected() {
        let config = Config::try_parse_from(["booking", "--bcrypt-cost", "2"]).unwrap();
        assert!(config.validate().is_err());
    }
}
