//! User Registry
//!
//! Account creation and credential checks. Registration enforces
//! username/email uniqueness; authentication deliberately reports the
//! same error for an unknown username and a wrong password.

use crate::credentials::CredentialStore;
use crate::error::Error;
use crate::models::{RegisterRequest, User};

use chrono::Utc;
use sqlx::SqlitePool;

/// Outcome of a successful credential check, ready for session creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
}

/// User account registry
pub struct UserRegistry {
    db: SqlitePool,
    credentials: CredentialStore,
    fallback_hash: String,
}

impl UserRegistry {
    /// Create a new registry
    pub fn new(db: SqlitePool, credentials: CredentialStore) -> Result<Self, Error> {
        // Hashed once up front so lookups that miss still have something
        // to verify against; see `authenticate`.
        let fallback_hash = credentials.hash("unreachable placeholder credential")?;

        Ok(Self {
            db,
            credentials,
            fallback_hash,
        })
    }

    /// Register a new user account, returning the stored record
    pub async fn register(&self, req: RegisterRequest) -> Result<User, Error> {
        if req.username.trim().is_empty() {
            return Err(Error::Validation("Username is required".to_string()));
        }
        if req.email.trim().is_empty() {
            return Err(Error::Validation("Email is required".to_string()));
        }
        if req.password.is_empty() {
            return Err(Error::Validation("Password is required".to_string()));
        }

        // Pre-checks for friendlier errors; the schema UNIQUE constraints
        // remain the source of truth under concurrent registration.
        if self.find_by_username(&req.username).await?.is_some() {
            return Err(Error::UsernameTaken);
        }
        if self.find_by_email(&req.email).await?.is_some() {
            return Err(Error::EmailTaken);
        }

        let password_hash = self.credentials.hash(&req.password)?;

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&req.username)
        .bind(&req.email)
        .bind(&password_hash)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
        .map_err(|e| Error::from_unique_violation(&e).unwrap_or_else(|| e.into()))?;

        tracing::info!(user_id = user.id, "user registered");

        Ok(user)
    }

    /// Check a username/password pair
    ///
    /// An unknown username and a wrong password fail identically so the
    /// response never reveals which accounts exist.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, Error> {
        match self.find_by_username(username).await? {
            Some(user) => {
                if self.credentials.verify(password, &user.password_hash) {
                    Ok(AuthenticatedUser {
                        id: user.id,
                        username: user.username,
                    })
                } else {
                    tracing::debug!(username, "login rejected: password mismatch");
                    Err(Error::InvalidCredentials)
                }
            }
            None => {
                // Burn a verification anyway so both failure paths cost
                // the same.
                let _ = self.credentials.verify(password, &self.fallback_hash);
                tracing::debug!(username, "login rejected: unknown username");
                Err(Error::InvalidCredentials)
            }
        }
    }

    /// Get user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    /// Get user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }
}
