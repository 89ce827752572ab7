//! User repository
//!
//! Database access layer for the user table

use super::types::User;
use crate::error::{Error, Result};
use sqlx::MySqlPool;

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    /// Create new repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM user WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Create user with a pre-hashed password
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<User> {
        sqlx::query("INSERT INTO user (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        self.get_by_username(username)
            .await?
            .ok_or(Error::NotFound("User not found after insert".to_string()))
    }
}
