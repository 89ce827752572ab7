//! Notice repository
//!
//! Database access layer for the notification table

use super::types::*;
use crate::error::{Error, Result};
use sqlx::MySqlPool;

const NOTICE_COLUMNS: &str = "id, title, content, created_at";

/// Notice repository for database operations
#[derive(Clone)]
pub struct NoticeRepository {
    pool: MySqlPool,
}

impl NoticeRepository {
    /// Create new repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get all notices
    pub async fn get_all(&self) -> Result<Vec<Notice>> {
        let query = format!("SELECT {} FROM notification", NOTICE_COLUMNS);
        let notices = sqlx::query_as::<_, Notice>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(notices)
    }

    /// Get notices, newest first (public board ordering)
    pub async fn get_recent(&self) -> Result<Vec<Notice>> {
        let query = format!(
            "SELECT {} FROM notification ORDER BY created_at DESC",
            NOTICE_COLUMNS
        );
        let notices = sqlx::query_as::<_, Notice>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(notices)
    }

    /// Get notice by ID
    pub async fn get(&self, id: i32) -> Result<Option<Notice>> {
        let query = format!("SELECT {} FROM notification WHERE id = ?", NOTICE_COLUMNS);
        let notice = sqlx::query_as::<_, Notice>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(notice)
    }

    /// Create notice
    pub async fn create(&self, req: &CreateNoticeRequest) -> Result<Notice> {
        let now = chrono::Utc::now();

        let result =
            sqlx::query("INSERT INTO notification (title, content, created_at) VALUES (?, ?, ?)")
                .bind(&req.title)
                .bind(&req.content)
                .bind(now)
                .execute(&self.pool)
                .await?;

        let id = result.last_insert_id() as i32;
        self.get(id)
            .await?
            .ok_or(Error::NotFound("Notice not found after insert".to_string()))
    }

    /// Update notice title/content
    pub async fn update(&self, id: i32, req: &UpdateNoticeRequest) -> Result<Notice> {
        sqlx::query("UPDATE notification SET title = ?, content = ? WHERE id = ?")
            .bind(&req.title)
            .bind(&req.content)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.get(id)
            .await?
            .ok_or(Error::NotFound("Notice not found after update".to_string()))
    }

    /// Delete notice
    pub async fn delete(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM notification WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
