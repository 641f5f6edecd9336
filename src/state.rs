use std::sync::Arc;

use crate::{
    auth::{
        jwt::JwtKeys,
        password::Hasher,
        repo::{PgUserRepository, UserRepository},
        services::AuthService,
    },
    config::AppConfig,
    db,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;

        let users = Arc::new(PgUserRepository::new(pool)) as Arc<dyn UserRepository>;
        Self::from_parts(config, users, Hasher::default())
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        hasher: Hasher,
    ) -> anyhow::Result<Self> {
        let keys = JwtKeys::from(&config.jwt);
        let auth = AuthService::new(users, hasher, keys)?;
        Ok(Self {
            config: Arc::new(config),
            auth,
        })
    }
}
