//! Citizen-issue data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Issue entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Issue {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Empty string until an official reply is recorded
    pub reply: String,
    pub phone: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub reply_date: DateTime<Utc>,
}

/// Create issue request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssueRequest {
    pub phone: String,
    pub name: String,
    pub title: String,
    pub description: String,
}

/// Reply request: updates the issue fields and records the reply
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyIssueRequest {
    pub name: String,
    pub phone: String,
    pub title: String,
    pub description: String,
    pub reply: String,
}
