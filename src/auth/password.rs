use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use tracing::error;

use crate::error::AppError;

/// Argon2id with fixed cost parameters. Hashes carry their own parameters,
/// so verification works for any hash this type produced.
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    params: Params,
}

impl Hasher {
    #[cfg(test)]
    pub fn cheap() -> Self {
        Self {
            params: Params::new(8, 1, 1, None).expect("valid argon2 params"),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, plain: &SecretString) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.expose_secret().as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                AppError::Internal(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    pub fn verify(&self, plain: &SecretString, hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            AppError::Internal(e.to_string())
        })?;
        Ok(self
            .argon2()
            .verify_password(plain.expose_secret().as_bytes(), &parsed)
            .is_ok())
    }

    /// `hash` on the blocking pool.
    pub async fn hash_blocking(&self, plain: SecretString) -> Result<String, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
    }

    /// `verify` on the blocking pool.
    pub async fn verify_blocking(&self, plain: SecretString, hash: String) -> Result<bool, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))?
    }
}
