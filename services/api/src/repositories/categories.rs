//! Product category repository

use tracing::info;

use super::Resource;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::category::{Category, CategoryPayload};
use crate::models::{EntityId, Page};
use crate::query::{ListFilters, with_query};

/// Category repository
#[derive(Clone, Debug)]
pub struct CategoryRepository {
    resource: Resource,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(client: ApiClient) -> Self {
        Self {
            resource: Resource::new(client, "/categories"),
        }
    }

    /// List categories
    pub async fn list(&self, filters: &ListFilters) -> ApiResult<Page<Category>> {
        let path = with_query(self.resource.path, &filters.to_query());
        self.resource.client.get(&path).await
    }

    /// Create a category
    pub async fn create(&self, payload: &CategoryPayload) -> ApiResult<Option<Category>> {
        info!("Creating category: {}", payload.name);
        self.resource.client.post(self.resource.path, payload).await
    }

    /// Update a category
    pub async fn update(
        &self,
        id: &EntityId,
        payload: &CategoryPayload,
    ) -> ApiResult<Option<Category>> {
        self.resource.client.put(&self.resource.item(id), payload).await
    }

    /// Delete a category
    pub async fn delete(&self, id: &EntityId) -> ApiResult<()> {
        info!("Deleting category: {}", id);
        self.resource.client.delete(&self.resource.item(id)).await
    }
}
