//! IssueService - Citizen Issue Board
//!
//! ## Responsibilities
//!
//! - Issue submission and deletion
//! - Official reply flow (reply text + reply_date stamp)
//! - Replied-only public listing

mod repository;
mod types;

pub use repository::IssueRepository;
pub use types::*;

use crate::error::{Error, Result};
use sqlx::MySqlPool;

/// Issue service for board operations
#[derive(Clone)]
pub struct IssueService {
    repo: IssueRepository,
}

impl IssueService {
    /// Create new service
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repo: IssueRepository::new(pool),
        }
    }

    /// List all issues
    pub async fn list(&self) -> Result<Vec<Issue>> {
        self.repo.get_all().await
    }

    /// List replied issues, newest first
    pub async fn list_replied(&self) -> Result<Vec<Issue>> {
        self.repo.get_replied().await
    }

    /// Get issue by ID
    pub async fn get(&self, id: i32) -> Result<Issue> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Issue {} not found", id)))
    }

    /// Submit a new issue
    pub async fn create(&self, req: CreateIssueRequest) -> Result<Issue> {
        if req.title.is_empty() || req.title.len() > 100 {
            return Err(Error::Validation(
                "title must be 1-100 characters".to_string(),
            ));
        }
        if req.description.is_empty() {
            return Err(Error::Validation(
                "description must not be empty".to_string(),
            ));
        }
        self.repo.create(&req).await
    }

    /// Record a reply on an existing issue
    pub async fn reply(&self, id: i32, req: ReplyIssueRequest) -> Result<Issue> {
        if self.repo.get(id).await?.is_none() {
            return Err(Error::NotFound(format!("Issue {} not found", id)));
        }
        self.repo.reply(id, &req).await
    }

    /// Delete issue
    pub async fn delete(&self, id: i32) -> Result<()> {
        if self.repo.get(id).await?.is_none() {
            return Err(Error::NotFound(format!("Issue {} not found", id)));
        }
        self.repo.delete(id).await
    }
}
