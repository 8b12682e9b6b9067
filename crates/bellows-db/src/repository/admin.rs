//! # Admin Repository
//!
//! Administrator accounts for the catalog dashboard.
//!
//! Passwords are stored as argon2 PHC strings; the plain text never touches
//! the database.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// A stored administrator account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for administrator accounts.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    pool: SqlitePool,
}

impl AdminRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AdminRepository { pool }
    }

    /// Creates an admin account with a freshly hashed password.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - e-mail already registered
    pub async fn create(&self, email: &str, password: &str) -> DbResult<AdminUser> {
        let email = email.trim();
        let user = AdminUser {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO admin_users (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value("email", email))?;

        info!(email = %user.email, "Admin account created");
        Ok(user)
    }

    /// Finds an account by e-mail (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<AdminUser>> {
        let user = sqlx::query_as::<_, AdminUser>(
            "SELECT id, email, password_hash, created_at FROM admin_users WHERE email = ?1",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Returns the account when the e-mail exists and the password matches.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> DbResult<Option<AdminUser>> {
        let Some(user) = self.find_by_email(email).await? else {
            debug!("Sign-in attempt for unknown e-mail");
            return Ok(None);
        };

        if verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            debug!(email = %user.email, "Sign-in attempt with wrong password");
            Ok(None)
        }
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Hash a password for storage.
pub fn hash_password(password: &str) -> DbResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against its stored hash.
fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
