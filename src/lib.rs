//! Bookshelf
//!
//! A shared book catalog with user accounts:
//! - Registration and login with Argon2id password hashing
//! - Server-side sessions via opaque bearer tokens
//! - Book CRUD keyed by title, uniqueness enforced by the schema
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `DATABASE_URL` - SQLite connection string (default: "sqlite:bookshelf.db")
//! - `BIND_ADDR` - listen address (default: "0.0.0.0:3000")
//! - `ARGON2_MEMORY_COST` - Argon2 memory cost in KiB (default: 65536)
//! - `ARGON2_TIME_COST` - Argon2 iterations (default: 3)
//! - `ARGON2_PARALLELISM` - Argon2 lanes (default: 4)
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookshelf::{config::AppConfig, db, handlers, App};
//!
//! let config = AppConfig::from_env();
//! config.validate()?;
//!
//! let pool = db::connect(&config.database_url).await?;
//! db::create_schema(&pool).await?;
//!
//! let app = std::sync::Arc::new(App::new(pool, &config)?);
//! let router = handlers::create_routes(app);
//! ```

pub mod catalog;
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod registry;
pub mod session;

// Re-export commonly used types
pub use catalog::BookCatalog;
pub use config::AppConfig;
pub use credentials::CredentialStore;
pub use error::Error;
pub use extractors::{CurrentUser, SessionToken};
pub use handlers::create_routes;
pub use models::*;
pub use registry::{AuthenticatedUser, UserRegistry};
pub use session::{Identity, Session, SessionStore};

use sqlx::SqlitePool;

/// Aggregated services container, shared as router state
pub struct App {
    pub registry: UserRegistry,
    pub catalog: BookCatalog,
    pub sessions: SessionStore,
}

impl App {
    /// Wire up the services over an already-migrated pool
    pub fn new(db: SqlitePool, config: &AppConfig) -> Result<Self, Error> {
        let credentials = CredentialStore::new(config);

        Ok(Self {
            registry: UserRegistry::new(db.clone(), credentials)?,
            catalog: BookCatalog::new(db),
            sessions: SessionStore::new(),
        })
    }
}
