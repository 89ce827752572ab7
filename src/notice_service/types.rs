//! Government-notice data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Notice entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notice {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Create notice request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoticeRequest {
    pub title: String,
    pub content: String,
}

/// Update notice request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNoticeRequest {
    pub title: String,
    pub content: String,
}
