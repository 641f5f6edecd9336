use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::Credentials,
        jwt::JwtKeys,
        password::Hasher,
        repo::UserRepository,
        repo_types::{NewUser, User},
    },
    error::AppError,
};

/// Signup, login and listing on top of a [`UserRepository`].
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Hasher,
    keys: JwtKeys,
    // Verified against when the username is unknown, so both failure paths cost one argon2 run.
    dummy_hash: Arc<str>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Hasher,
        keys: JwtKeys,
    ) -> Result<Self, AppError> {
        let dummy_hash = hasher.hash(&SecretString::new(Uuid::new_v4().to_string()))?;
        Ok(Self {
            users,
            hasher,
            keys,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn signup(&self, creds: Credentials) -> Result<User, AppError> {
        let password_hash = self.hasher.hash_blocking(creds.password).await?;
        let new_user = NewUser {
            id: Uuid::new_v4(),
            username: creds.username,
            password_hash,
        };
        let user = self.users.create(new_user).await?;
        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Returns a signed token for the user on success.
    pub async fn login(&self, creds: Credentials) -> Result<String, AppError> {
        let user = self.users.find_by_username(&creds.username).await?;
        let hash = match &user {
            Some(u) => u.password_hash.clone(),
            None => self.dummy_hash.to_string(),
        };
        let ok = self.hasher.verify_blocking(creds.password, hash).await?;

        let user = match user {
            Some(u) if ok => u,
            Some(u) => {
                warn!(user_id = %u.id, "login invalid password");
                return Err(AppError::Authentication);
            }
            None => {
                warn!(username = %creds.username, "login unknown username");
                return Err(AppError::Authentication);
            }
        };

        let token = self.keys.sign(user.id)?;
        info!(user_id = %user.id, "login succeeded");
        Ok(token)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.list_all().await?)
    }
}
