use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique field (username or email) is already taken.
    #[error("unique constraint violated")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Unavailable(e.to_string()),
        }
    }
}

/// Credential store used by registration, login and the access gate.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password. Unique violations surface as `Conflict`.
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, username, password_hash, created_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }
}

#[cfg(test)]
pub use memory::InMemoryUserStore;

#[cfg(test)]
mod memory {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use time::OffsetDateTime;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct InMemoryUserStore {
        users: RwLock<Vec<User>>,
        offline: AtomicBool,
    }

    impl InMemoryUserStore {
        pub async fn remove(&self, id: Uuid) {
            self.users.write().await.retain(|u| u.id != id);
        }

        /// While offline every call fails with `StoreError::Unavailable`.
        pub fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn check_online(&self) -> Result<(), StoreError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserStore for InMemoryUserStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
            self.check_online()?;
            let users = self.users.read().await;
            Ok(users.iter().find(|u| u.username == username).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
            self.check_online()?;
            let users = self.users.read().await;
            Ok(users.iter().find(|u| u.id == id).cloned())
        }

        async fn create(&self, user: NewUser) -> Result<User, StoreError> {
            self.check_online()?;
            let mut users = self.users.write().await;
            if users
                .iter()
                .any(|u| u.username == user.username || u.email == user.email)
            {
                return Err(StoreError::Conflict);
            }
            let created = User {
                id: Uuid::new_v4(),
                email: user.email,
                username: user.username,
                password_hash: user.password_hash,
                created_at: OffsetDateTime::now_utc(),
            };
            users.push(created.clone());
            Ok(created)
        }

        async fn list(&self) -> Result<Vec<User>, StoreError> {
            self.check_online()?;
            Ok(self.users.read().await.clone())
        }
    }
}
