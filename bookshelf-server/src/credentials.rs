//! Password hashing and verification (Argon2id)
//!
//! [`CredentialService::hash`] salts with [`OsRng`] and returns a PHC string
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), which is what the `users.password`
//! column stores. [`CredentialService::verify`] reads the parameters back out of
//! that string, so digests stay verifiable if the configured cost changes.
//!
//! Accounts created before the switch to Argon2 hold bcrypt digests
//! (`$2b$10$...`). `verify` still accepts those; new digests are always Argon2id.
//!
//! Both operations are CPU-bound on purpose. Request handlers call the `_blocking`
//! variants, which move the work onto Tokio's blocking pool.
//!
//! Secrets are never logged and never leave this module except as digests.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Memory cost in KiB for production hashing
const MEMORY_COST_KIB: u32 = 19 * 1024;

/// Iterations for production hashing
const TIME_COST: u32 = 2;

/// Lanes for production hashing
const PARALLELISM: u32 = 1;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hash failed: {0}")]
    Hash(String),

    #[error("password verification failed: {0}")]
    Verify(String),
}

/// Hashes and verifies password secrets at a fixed cost
#[derive(Debug, Clone)]
pub struct CredentialService {
    params: Params,
}

impl Default for CredentialService {
    fn default() -> Self {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .unwrap_or_default();
        Self { params }
    }
}

impl CredentialService {
    /// Use explicit Argon2 parameters (tests use a cheap cost).
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Produce a salted one-way digest of `secret`.
    pub fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?;
        Ok(digest.to_string())
    }

    /// Check `secret` against a stored digest.
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only when the digest itself is unusable.
    pub fn verify(&self, secret: &str, digest: &str) -> Result<bool, CredentialError> {
        if is_bcrypt(digest) {
            return bcrypt::verify(secret, digest).map_err(|e| CredentialError::Verify(e.to_string()));
        }

        let parsed =
            PasswordHash::new(digest).map_err(|e| CredentialError::Verify(e.to_string()))?;

        match self.argon2().verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::Verify(e.to_string())),
        }
    }

    /// [`Self::hash`] on the blocking pool.
    pub async fn hash_blocking(&self, secret: String) -> Result<String, CredentialError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&secret))
            .await
            .map_err(|e| CredentialError::Hash(e.to_string()))?
    }

    /// [`Self::verify`] on the blocking pool.
    pub async fn verify_blocking(
        &self,
        secret: String,
        digest: String,
    ) -> Result<bool, CredentialError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify(&secret, &digest))
            .await
            .map_err(|e| CredentialError::Verify(e.to_string()))?
    }
}

/// Modular-crypt bcrypt digest (`$2a$`, `$2b$`, `$2y$`, ...)
fn is_bcrypt(digest: &str) -> bool {
    digest.starts_with("$2")
}

#[cfg(test)]
pub(crate) fn test_service() -> CredentialService {
    // Minimum Argon2 cost keeps debug-mode tests fast
    CredentialService::new(Params::new(8, 1, 1, None).expect("valid test params"))
}
