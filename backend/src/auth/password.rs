//! Password hashing
//!
//! New hashes use the configured algorithm (bcrypt by default). Verification
//! recognises both bcrypt (`$2a$`/`$2b$`/`$2y$`) and Argon2 (`$argon2`) hashes,
//! so switching algorithms does not lock out existing accounts.
//!
//! Both algorithms are intentionally CPU-intensive; async callers should use
//! [`PasswordService::hash_async`] and [`PasswordService::verify_async`].

use crate::config::{PasswordAlgorithm, PasswordConfig};
use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Password hashing service
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    algorithm: PasswordAlgorithm,
    bcrypt_cost: u32,
}

impl PasswordService {
    pub fn new(algorithm: PasswordAlgorithm, bcrypt_cost: u32) -> Self {
        Self {
            algorithm,
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &PasswordConfig) -> Self {
        Self::new(config.algorithm, config.bcrypt_cost)
    }

    /// Hash a password with a fresh salt (blocking operation)
    pub fn hash(&self, password: &str) -> Result<String> {
        match self.algorithm {
            PasswordAlgorithm::Bcrypt => bcrypt::hash(password, self.bcrypt_cost)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e)),
            PasswordAlgorithm::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
                Ok(hash.to_string())
            }
        }
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Returns `Ok(false)` on mismatch and `Err` only when the stored hash is
    /// unreadable.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        if hash.starts_with("$argon2") {
            let parsed = PasswordHash::new(hash)
                .map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok());
        }

        bcrypt::verify(password, hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::from_config(&PasswordConfig::default())
    }
}
