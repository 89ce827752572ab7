//! RecycledItemService - Second-Hand Goods Marketplace
//!
//! ## Responsibilities
//!
//! - Item CRUD over the recycled_item table
//! - Putaway flag controls public marketplace visibility

mod repository;
mod types;

pub use repository::RecycledItemRepository;
pub use types::*;

use crate::error::{Error, Result};
use sqlx::MySqlPool;

/// Recycled-item service for marketplace operations
#[derive(Clone)]
pub struct RecycledItemService {
    repo: RecycledItemRepository,
}

impl RecycledItemService {
    /// Create new service
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repo: RecycledItemRepository::new(pool),
        }
    }

    /// List all items (admin view)
    pub async fn list(&self) -> Result<Vec<RecycledItem>> {
        self.repo.get_all().await
    }

    /// List putaway items (public marketplace)
    pub async fn list_putaway(&self) -> Result<Vec<RecycledItem>> {
        self.repo.get_putaway().await
    }

    /// Get item by ID
    pub async fn get(&self, id: i32) -> Result<RecycledItem> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Recycled item {} not found", id)))
    }

    /// Create item with its saved image path
    pub async fn create(
        &self,
        req: CreateRecycledItemRequest,
        image_url: &str,
    ) -> Result<RecycledItem> {
        if req.name.is_empty() || req.name.len() > 130 {
            return Err(Error::Validation(
                "name must be 1-130 characters".to_string(),
            ));
        }
        self.repo.create(&req, image_url).await
    }

    /// Update item
    pub async fn update(&self, id: i32, req: UpdateRecycledItemRequest) -> Result<RecycledItem> {
        if self.repo.get(id).await?.is_none() {
            return Err(Error::NotFound(format!("Recycled item {} not found", id)));
        }
        self.repo.update(id, &req).await
    }

    /// Delete item
    pub async fn delete(&self, id: i32) -> Result<()> {
        if self.repo.get(id).await?.is_none() {
            return Err(Error::NotFound(format!("Recycled item {} not found", id)));
        }
        self.repo.delete(id).await
    }
}
