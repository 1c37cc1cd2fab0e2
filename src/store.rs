use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::TrackedItem;
use crate::utils::error::{AppError, Result};

/// Storage for tracked items and their last known prices.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn insert(&self, item: TrackedItem) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<TrackedItem>;
    async fn list(&self) -> Result<Vec<TrackedItem>>;
    async fn update(&self, item: TrackedItem) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<HashMap<Uuid, TrackedItem>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(id: Uuid) -> AppError {
    AppError::NotFound {
        resource: format!("tracked item {}", id),
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, item: TrackedItem) -> Result<()> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(AppError::Validation(format!("Tracked item {} already exists", item.id)));
        }
        items.insert(item.id, item);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<TrackedItem> {
        let items = self.items.read().await;
        items.get(&id).cloned().ok_or_else(|| missing(id))
    }

    /// Items ordered by creation time, oldest first.
    async fn list(&self) -> Result<Vec<TrackedItem>> {
        let items = self.items.read().await;
        let mut listed: Vec<TrackedItem> = items.values().cloned().collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(listed)
    }

    async fn update(&self, item: TrackedItem) -> Result<()> {
        let mut items = self.items.write().await;
        match items.get_mut(&item.id) {
            Some(existing) => {
                *existing = item;
                Ok(())
            }
            None => Err(missing(item.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut items = self.items.write().await;
        items.remove(&id).map(|_| ()).ok_or_else(|| missing(id))
    }
}
