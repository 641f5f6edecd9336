use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::repo_types::{NewUser, User};

#[derive(Debug, Error)]
pub enum RepoError {
    /// A live user with this username already exists.
    #[error("username already taken")]
    UsernameTaken,
    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}

/// Persistence contract for user records. Lookups only ever see live
/// (non-deleted) rows.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Username uniqueness is enforced here, by the store.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
    async fn list_all(&self) -> Result<Vec<User>, RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, created_at, updated_at, deleted_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepoError::UsernameTaken
            }
            other => RepoError::Backend(other),
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE username = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }
}

#[cfg(test)]
mod pg_tests {
    use uuid::Uuid;

    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".into(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn duplicate_live_username_is_username_taken(db: PgPool) {
        let repo = PgUserRepository::new(db.clone());
        let alice = repo.create(new_user("alice")).await.expect("first insert");

        let err = repo.create(new_user("alice")).await.unwrap_err();
        assert!(matches!(err, RepoError::UsernameTaken));

        sqlx::query("UPDATE users SET deleted_at = now() WHERE id = $1")
            .bind(alice.id)
            .execute(&db)
            .await
            .unwrap();
        assert!(repo.find_by_username("alice").await.unwrap().is_none());
        assert!(repo.list_all().await.unwrap().is_empty());

        let again = repo
            .create(new_user("alice"))
            .await
            .expect("soft-deleted row frees the username");
        let listed = repo.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, again.id);
    }
}
