//! Application Configuration
//!
//! All configuration values are loaded from environment variables.
//! No hardcoded secrets or sensitive data.

use crate::error::Error;
use std::env;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string (from DATABASE_URL env var)
    pub database_url: String,

    /// Address the HTTP server binds to (from BIND_ADDR env var)
    pub bind_addr: String,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:bookshelf.db".to_string()),

            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),

            argon2_memory_cost: env::var("ARGON2_MEMORY_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(65536), // 64 MiB

            argon2_time_cost: env::var("ARGON2_TIME_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),

            argon2_parallelism: env::var("ARGON2_PARALLELISM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Error> {
        if self.database_url.is_empty() {
            return Err(Error::Config("DATABASE_URL must not be empty".to_string()));
        }

        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(Error::Config(
                "BIND_ADDR must be a valid socket address".to_string(),
            ));
        }

        // Argon2 rejects costs below these floors at hash time
        if self.argon2_memory_cost < 8 {
            return Err(Error::Config(
                "ARGON2_MEMORY_COST must be at least 8 KiB".to_string(),
            ));
        }

        if self.argon2_time_cost < 1 {
            return Err(Error::Config(
                "ARGON2_TIME_COST must be at least 1".to_string(),
            ));
        }

        if self.argon2_parallelism < 1 {
            return Err(Error::Config(
                "ARGON2_PARALLELISM must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
impl AppConfig {
    /// Minimal-cost configuration for tests
    pub(crate) fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            argon2_memory_cost: 8,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = AppConfig {
            database_url: "sqlite:bookshelf.db".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            argon2_memory_cost: 65536,
            argon2_time_cost: 3,
            argon2_parallelism: 4,
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_database_url() {
        let config = AppConfig {
            database_url: String::new(),
            ..AppConfig::for_tests()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_bind_addr() {
        let config = AppConfig {
            bind_addr: "not-an-address".to_string(),
            ..AppConfig::for_tests()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_time_cost() {
        let config = AppConfig {
            argon2_time_cost: 0,
            ..AppConfig::for_tests()
        };

        assert!(config.validate().is_err());
    }
}
