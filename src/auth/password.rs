use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Hashes `plain` with a fresh random salt. The result is a PHC string that
/// embeds the salt and cost parameters.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Constant-time check of `plain` against a stored PHC hash.
/// A hash that does not parse is an error rather than a mismatch.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// A user's password as it moves toward the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordField {
    /// Set or changed by the caller; must be hashed before persisting.
    Plain(String),
    /// Already hashed and untouched since it was loaded.
    Hashed(String),
}

impl PasswordField {
    /// Returns the value to persist, hashing only when the field changed.
    pub fn seal(self) -> anyhow::Result<String> {
        match self {
            Self::Plain(plain) => hash_password(&plain),
            Self::Hashed(hash) => Ok(hash),
        }
    }
}
