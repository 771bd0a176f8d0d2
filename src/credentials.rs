//! Credential Store
//!
//! Password hashing and verification. Only salted Argon2id hashes in
//! PHC string format ever reach storage; plaintext passwords exist for
//! the duration of a request.

use crate::config::AppConfig;
use crate::error::Error;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};

/// Password hashing and verification with configurable Argon2id costs
#[derive(Debug, Clone)]
pub struct CredentialStore {
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl CredentialStore {
    /// Create a credential store with costs taken from configuration
    pub fn new(config: &AppConfig) -> Self {
        Self {
            memory_cost: config.argon2_memory_cost,
            time_cost: config.argon2_time_cost,
            parallelism: config.argon2_parallelism,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, Error> {
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| Error::Internal)?;

        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }

    /// Hash a password using Argon2id with a fresh random salt
    ///
    /// Two calls with the same input produce different strings; the salt
    /// is embedded in the PHC-format result for later verification.
    pub fn hash(&self, password: &str) -> Result<String, Error> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        Ok(hash)
    }

    /// Verify a password against a stored hash
    ///
    /// Recomputes using the salt and parameters embedded in the hash
    /// string and compares in constant time. A malformed hash string
    /// verifies as false rather than surfacing an error.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        let Ok(argon2) = self.hasher() else {
            return false;
        };

        argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        CredentialStore::new(&AppConfig::for_tests())
    }

    #[test]
    fn test_hash_verify_round_trip() {
        let store = store();
        let hash = store.hash("correct horse battery staple").unwrap();

        assert!(store.verify("correct horse battery staple", &hash));
        assert!(!store.verify("wrong password", &hash));
    }

    #[test]
    fn test_hash_embeds_fresh_salt() {
        let store = store();
        let first = store.hash("hunter2").unwrap();
        let second = store.hash("hunter2").unwrap();

        // Same input, different salt, different string; both still verify
        assert_ne!(first, second);
        assert!(store.verify("hunter2", &first));
        assert!(store.verify("hunter2", &second));
    }

    #[test]
    fn test_verify_malformed_hash_is_false() {
        let store = store();

        assert!(!store.verify("anything", ""));
        assert!(!store.verify("anything", "not-a-phc-string"));
        assert!(!store.verify("anything", "$argon2id$truncated"));
    }

    #[test]
    fn test_hash_output_is_phc_format() {
        let store = store();
        let hash = store.hash("hunter2").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("hunter2"));
    }
}
