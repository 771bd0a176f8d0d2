//! Database Setup
//!
//! Pool construction and runtime schema creation. The UNIQUE constraints
//! declared here are the authoritative uniqueness enforcement for
//! usernames, emails, and book titles; application-level pre-checks are
//! only an optimization for friendlier error messages.

use crate::error::Error;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Open a connection pool to the given SQLite database
pub async fn connect(database_url: &str) -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // A `:memory:` database exists per connection; cap the pool at one
    // so every query sees the same schema.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create the tables if they do not exist yet
pub async fn create_schema(pool: &SqlitePool) -> Result<(), Error> {
    tracing::info!("Creating database schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username VARCHAR(50) NOT NULL UNIQUE,
            email VARCHAR(100) NOT NULL UNIQUE,
            password_hash VARCHAR(200) NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            title VARCHAR(80) PRIMARY KEY,
            description TEXT,
            rating REAL
        );
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema ready");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = connect("sqlite::memory:").await.expect("in-memory pool");
    create_schema(&pool).await.expect("schema creation");
    pool
}
