//! Recycled-item repository
//!
//! Database access layer for the recycled_item table

use super::types::*;
use crate::error::{Error, Result};
use sqlx::MySqlPool;

const ITEM_COLUMNS: &str =
    "id, name, description, phone, is_putaway, created_at, image_url, item_name";

/// Recycled-item repository for database operations
#[derive(Clone)]
pub struct RecycledItemRepository {
    pool: MySqlPool,
}

impl RecycledItemRepository {
    /// Create new repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get all items (admin view)
    pub async fn get_all(&self) -> Result<Vec<RecycledItem>> {
        let query = format!("SELECT {} FROM recycled_item", ITEM_COLUMNS);
        let items = sqlx::query_as::<_, RecycledItem>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Get putaway items (public marketplace)
    pub async fn get_putaway(&self) -> Result<Vec<RecycledItem>> {
        let query = format!(
            "SELECT {} FROM recycled_item WHERE is_putaway = TRUE",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, RecycledItem>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Get item by ID
    pub async fn get(&self, id: i32) -> Result<Option<RecycledItem>> {
        let query = format!("SELECT {} FROM recycled_item WHERE id = ?", ITEM_COLUMNS);
        let item = sqlx::query_as::<_, RecycledItem>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Create item. New items start off the marketplace (is_putaway FALSE).
    pub async fn create(
        &self,
        req: &CreateRecycledItemRequest,
        image_url: &str,
    ) -> Result<RecycledItem> {
        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO recycled_item
                (name, description, phone, is_putaway, created_at, image_url, item_name)
            VALUES (?, ?, ?, FALSE, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.phone)
        .bind(now)
        .bind(image_url)
        .bind(&req.item_name)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i32;
        self.get(id)
            .await?
            .ok_or(Error::NotFound("Item not found after insert".to_string()))
    }

    /// Update name/description/putaway flag
    pub async fn update(&self, id: i32, req: &UpdateRecycledItemRequest) -> Result<RecycledItem> {
        sqlx::query("UPDATE recycled_item SET name = ?, description = ?, is_putaway = ? WHERE id = ?")
            .bind(&req.name)
            .bind(&req.description)
            .bind(req.is_putaway)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.get(id)
            .await?
            .ok_or(Error::NotFound("Item not found after update".to_string()))
    }

    /// Delete item
    pub async fn delete(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM recycled_item WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
