//! Recycled-goods data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Recycled item entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecycledItem {
    pub id: i32,
    /// Seller name
    pub name: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    /// Listed on the public marketplace when true
    pub is_putaway: bool,
    pub created_at: DateTime<Utc>,
    /// Saved upload path for the item photo
    pub image_url: Option<String>,
    pub item_name: Option<String>,
}

/// Create request (image path is attached by the upload handler)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecycledItemRequest {
    pub name: String,
    pub phone: String,
    pub item_name: String,
    pub description: String,
}

/// Update request (admin edit + putaway toggle)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRecycledItemRequest {
    pub name: String,
    pub description: String,
    pub is_putaway: bool,
}
