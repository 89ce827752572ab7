//! Issue repository
//!
//! Database access layer for the issue table

use super::types::*;
use crate::error::{Error, Result};
use sqlx::MySqlPool;

const ISSUE_COLUMNS: &str = "id, title, description, reply, phone, name, created_at, reply_date";

/// Issue repository for database operations
#[derive(Clone)]
pub struct IssueRepository {
    pool: MySqlPool,
}

impl IssueRepository {
    /// Create new repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get all issues
    pub async fn get_all(&self) -> Result<Vec<Issue>> {
        let query = format!("SELECT {} FROM issue", ISSUE_COLUMNS);
        let issues = sqlx::query_as::<_, Issue>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(issues)
    }

    /// Get issues that carry a non-empty reply, newest first
    pub async fn get_replied(&self) -> Result<Vec<Issue>> {
        let query = format!(
            "SELECT {} FROM issue WHERE reply IS NOT NULL AND reply != '' ORDER BY created_at DESC",
            ISSUE_COLUMNS
        );
        let issues = sqlx::query_as::<_, Issue>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(issues)
    }

    /// Get issue by ID
    pub async fn get(&self, id: i32) -> Result<Option<Issue>> {
        let query = format!("SELECT {} FROM issue WHERE id = ?", ISSUE_COLUMNS);
        let issue = sqlx::query_as::<_, Issue>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(issue)
    }

    /// Create issue (reply starts empty)
    pub async fn create(&self, req: &CreateIssueRequest) -> Result<Issue> {
        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO issue (title, description, reply, phone, name, created_at, reply_date)
            VALUES (?, ?, '', ?, ?, ?, ?)
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.phone)
        .bind(&req.name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i32;
        self.get(id)
            .await?
            .ok_or(Error::NotFound("Issue not found after insert".to_string()))
    }

    /// Record a reply: update editable fields and stamp reply_date
    pub async fn reply(&self, id: i32, req: &ReplyIssueRequest) -> Result<Issue> {
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            UPDATE issue
            SET name = ?, phone = ?, title = ?, description = ?, reply = ?, reply_date = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.name)
        .bind(&req.phone)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.reply)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get(id)
            .await?
            .ok_or(Error::NotFound("Issue not found after reply".to_string()))
    }

    /// Delete issue
    pub async fn delete(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM issue WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
