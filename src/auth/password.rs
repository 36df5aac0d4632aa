use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Argon2 PHC string produced by [`PasswordHasher::hash`].
///
/// The store only accepts this type, so a plaintext can never be persisted
/// and an existing hash can never be hashed a second time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

lazy_static! {
    static ref DUMMY_HASH: Option<String> = PasswordHasher
        .hash("authgate-dummy-password")
        .ok()
        .map(|h| h.0);
}

/// Salted, adaptive one-way hashing (argon2id, default cost parameters).
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn hash(&self, plain: &str) -> Result<HashedPassword, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                PasswordError::HashingFailed(e.to_string())
            })?
            .to_string();
        Ok(HashedPassword(hash))
    }

    /// Returns `Ok(false)` on mismatch. Argon2 compares digests in constant
    /// time. Errors only when `hash` isn't a PHC string.
    pub fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            PasswordError::MalformedHash(e.to_string())
        })?;
        Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }

    /// Burns one verification so a login for an unknown email takes as long
    /// as a login with a wrong password.
    pub fn verify_dummy(&self, plain: &str) {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = self.verify(plain, hash);
        }
    }
}
