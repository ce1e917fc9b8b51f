//! User Storage
//! Mission: Persist user accounts in SQLite behind the repository interface

use crate::auth::models::{NewUser, User};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension, Row};
use tracing::{info, warn};

/// Insert refused because the email is already registered
#[derive(Debug, thiserror::Error)]
#[error("email already registered: {0}")]
pub struct DuplicateEmail(pub String);

/// Principal persistence, keyed by numeric id with email as the unique username
pub trait UserRepository: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    fn exists_by_email(&self, email: &str) -> Result<bool>;
    fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    /// Fails with [`DuplicateEmail`] when the email is already stored.
    fn save(&self, user: NewUser) -> Result<User>;
    fn delete_by_id(&self, id: i64) -> Result<()>;
}

const USER_COLUMNS: &str = "id, email, first_name, last_name, password, admin, created_at, updated_at";

/// User storage with SQLite backend
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize database
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open user database at {}", self.db_path))
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password TEXT NOT NULL,
                admin INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Create an admin account unless one already exists. `password_hash` must
    /// already be encoded. Returns whether an account was created.
    pub fn seed_admin(&self, email: &str, password_hash: String) -> Result<bool> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users WHERE admin = 1", [], |row| {
                row.get(0)
            })
            .context("Failed to check for admin users")?;

        if count > 0 {
            return Ok(false);
        }

        self.save(NewUser {
            email: email.to_string(),
            first_name: "Admin".to_string(),
            last_name: "Admin".to_string(),
            password: password_hash,
            admin: true,
        })?;

        info!("🔐 Default admin user created (email: {})", email);
        warn!("⚠️  CHANGE DEFAULT PASSWORD IN PRODUCTION!");
        Ok(true)
    }

    fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            password: row.get(4)?,
            admin: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl UserRepository for UserStore {
    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.connect()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                Self::row_to_user,
            )
            .optional()
            .context("Failed to look up user by email")?;
        Ok(user)
    }

    fn exists_by_email(&self, email: &str) -> Result<bool> {
        let conn = self.connect()?;
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
                params![email],
                |row| row.get(0),
            )
            .context("Failed to check email uniqueness")?;
        Ok(exists)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let conn = self.connect()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                Self::row_to_user,
            )
            .optional()
            .context("Failed to look up user by id")?;
        Ok(user)
    }

    fn save(&self, user: NewUser) -> Result<User> {
        let now = Utc::now().to_rfc3339();
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO users (email, first_name, last_name, password, admin, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                user.email,
                user.first_name,
                user.last_name,
                user.password,
                user.admin,
                now,
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                anyhow::Error::new(DuplicateEmail(user.email.clone()))
            }
            other => anyhow::Error::new(other).context("Failed to insert user"),
        })?;

        let saved = User {
            id: conn.last_insert_rowid(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password: user.password,
            admin: user.admin,
            created_at: now.clone(),
            updated_at: now,
        };

        info!("✅ Created user: {} (id {})", saved.email, saved.id);
        Ok(saved)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        let conn = self.connect()?;
        let rows_affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            anyhow::bail!("User not found");
        }

        info!("🗑️  Deleted user: {}", id);
        Ok(())
    }
}
