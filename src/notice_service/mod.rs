//! NoticeService - Government Notice Board
//!
//! ## Responsibilities
//!
//! - Notice CRUD over the notification table
//! - Newest-first ordering for public views

mod repository;
mod types;

pub use repository::NoticeRepository;
pub use types::*;

use crate::error::{Error, Result};
use sqlx::MySqlPool;

/// Notice service for board operations
#[derive(Clone)]
pub struct NoticeService {
    repo: NoticeRepository,
}

impl NoticeService {
    /// Create new service
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repo: NoticeRepository::new(pool),
        }
    }

    /// List all notices
    pub async fn list(&self) -> Result<Vec<Notice>> {
        self.repo.get_all().await
    }

    /// List notices, newest first
    pub async fn list_recent(&self) -> Result<Vec<Notice>> {
        self.repo.get_recent().await
    }

    /// Get notice by ID
    pub async fn get(&self, id: i32) -> Result<Notice> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Notice {} not found", id)))
    }

    /// Create notice
    pub async fn create(&self, req: CreateNoticeRequest) -> Result<Notice> {
        validate_title(&req.title)?;
        self.repo.create(&req).await
    }

    /// Update notice
    pub async fn update(&self, id: i32, req: UpdateNoticeRequest) -> Result<Notice> {
        validate_title(&req.title)?;
        if self.repo.get(id).await?.is_none() {
            return Err(Error::NotFound(format!("Notice {} not found", id)));
        }
        self.repo.update(id, &req).await
    }

    /// Delete notice
    pub async fn delete(&self, id: i32) -> Result<()> {
        if self.repo.get(id).await?.is_none() {
            return Err(Error::NotFound(format!("Notice {} not found", id)));
        }
        self.repo.delete(id).await
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() || title.len() > 100 {
        return Err(Error::Validation(
            "title must be 1-100 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert!(validate_title("spring planting schedule").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"x".repeat(101)).is_err());
    }
}
