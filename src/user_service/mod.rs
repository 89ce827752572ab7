//! UserService - Registration and Login
//!
//! ## Responsibilities
//!
//! - Account creation with salted password hashes
//! - Credential verification for login

mod repository;
mod types;

pub use repository::UserRepository;
pub use types::*;

use crate::error::{Error, Result};
use sqlx::MySqlPool;

/// User service for registration/login
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    /// Create new service
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repo: UserRepository::new(pool),
        }
    }

    /// Register a new account. Duplicate usernames are a Conflict.
    pub async fn register(&self, req: RegisterRequest) -> Result<User> {
        if req.username.is_empty() || req.username.len() > 80 {
            return Err(Error::Validation(
                "username must be 1-80 characters".to_string(),
            ));
        }
        if req.password.is_empty() {
            return Err(Error::Validation("password must not be empty".to_string()));
        }

        if self.repo.get_by_username(&req.username).await?.is_some() {
            return Err(Error::Conflict(format!(
                "Username {} already exists",
                req.username
            )));
        }

        let hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
            .map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))?;

        self.repo.create(&req.username, &hash).await
    }

    /// Verify credentials. Returns false for unknown user or wrong password.
    pub async fn verify_login(&self, req: &LoginRequest) -> Result<bool> {
        let user = match self.repo.get_by_username(&req.username).await? {
            Some(u) => u,
            None => return Ok(false),
        };

        bcrypt::verify(&req.password, &user.password_hash)
            .map_err(|e| Error::Internal(format!("password verification failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_hash_roundtrip() {
        let hash = bcrypt::hash("hunter2", 4).unwrap();
        assert!(bcrypt::verify("hunter2", &hash).unwrap());
        assert!(!bcrypt::verify("wrong", &hash).unwrap());
    }
}
