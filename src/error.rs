//! Error Types
//!
//! Centralized error handling for registration, authentication, and
//! catalog operations.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Service errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("A book with that title already exists")]
    DuplicateTitle,

    #[error("Rating must be a finite number")]
    InvalidRating,

    #[error("Book not found")]
    BookNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    Internal,
}

impl Error {
    /// Map a storage-level UNIQUE violation to the conflict error the
    /// application pre-check would have produced.
    ///
    /// The schema constraints are the real uniqueness enforcement; the
    /// pre-checks only exist to pick the friendlier message. A violation
    /// that races past a pre-check must surface as the same error kind.
    pub(crate) fn from_unique_violation(err: &sqlx::Error) -> Option<Self> {
        let db_err = err.as_database_error()?;
        let message = db_err.message();

        if !message.contains("UNIQUE constraint failed") {
            return None;
        }

        if message.contains("users.username") {
            Some(Error::UsernameTaken)
        } else if message.contains("users.email") {
            Some(Error::EmailTaken)
        } else if message.contains("books.title") {
            Some(Error::DuplicateTitle)
        } else {
            None
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            Error::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
            ),
            Error::UsernameTaken => (
                StatusCode::CONFLICT,
                "username_taken",
                self.to_string(),
            ),
            Error::EmailTaken => (
                StatusCode::CONFLICT,
                "email_taken",
                self.to_string(),
            ),
            Error::DuplicateTitle => (
                StatusCode::CONFLICT,
                "duplicate_title",
                self.to_string(),
            ),
            Error::InvalidRating => (
                StatusCode::BAD_REQUEST,
                "invalid_rating",
                self.to_string(),
            ),
            Error::BookNotFound => (
                StatusCode::NOT_FOUND,
                "book_not_found",
                self.to_string(),
            ),
            Error::UserNotFound => (
                StatusCode::NOT_FOUND,
                "user_not_found",
                self.to_string(),
            ),
            Error::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                msg.clone(),
            ),
            Error::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration_error",
                msg.clone(),
            ),
            Error::Database(_) | Error::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        (
            status,
            Json(serde_json::json!({
                "error": error_code,
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        Error::Database(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        Error::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn test_unique_violations_map_to_conflicts() {
        let pool = db::test_pool().await;

        sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES ('ada', 'ada@example.com', 'h', '2026-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES ('ada', 'other@example.com', 'h', '2026-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap_err();
        assert!(matches!(
            Error::from_unique_violation(&err),
            Some(Error::UsernameTaken)
        ));

        let err = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES ('grace', 'ada@example.com', 'h', '2026-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap_err();
        assert!(matches!(
            Error::from_unique_violation(&err),
            Some(Error::EmailTaken)
        ));

        sqlx::query("INSERT INTO books (title) VALUES ('Dune')")
            .execute(&pool)
            .await
            .unwrap();
        let err = sqlx::query("INSERT INTO books (title) VALUES ('Dune')")
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(matches!(
            Error::from_unique_violation(&err),
            Some(Error::DuplicateTitle)
        ));
    }

    #[tokio::test]
    async fn test_non_unique_errors_are_not_conflicts() {
        let pool = db::test_pool().await;

        let err = sqlx::query("INSERT INTO users (username) VALUES ('ada')")
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(Error::from_unique_violation(&err).is_none());
    }
}
