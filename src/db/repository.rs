//! User repository for filevault.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::traits::UserStore;
use super::user::{NewUser, User};
use crate::{Result, VaultError};

/// SQLite-backed user store.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new UserRepository sharing the given pool.
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (email, password_digest) VALUES (?, ?)")
            .bind(&new_user.email)
            .bind(&new_user.password_digest)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| VaultError::NotFound("user".to_string()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_digest FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_digest FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn new_user(email: &str) -> NewUser {
        NewUser::new(email, "$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$aGFzaA")
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let user = repo.insert(&new_user("alice@example.com")).await.unwrap();
        assert!(user.id > 0);
        assert_eq!(user.email, "alice@example.com");

        let found = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.email, "alice@example.com");

        let found = repo
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        assert!(repo.find_by_id(42).await.unwrap().is_none());
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        repo.insert(&new_user("dup@example.com")).await.unwrap();
        let result = repo.insert(&new_user("dup@example.com")).await;
        assert!(matches!(result, Err(VaultError::Database(_))));
    }

    #[tokio::test]
    async fn test_count() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        assert_eq!(repo.count().await.unwrap(), 0);
        repo.insert(&new_user("a@example.com")).await.unwrap();
        repo.insert(&new_user("b@example.com")).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
