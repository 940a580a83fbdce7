//! Product catalog repository

use tracing::info;

use super::Resource;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::product::{Product, ProductPayload};
use crate::models::{EntityId, Page};
use crate::query::{ListFilters, with_query};

/// Product repository
#[derive(Clone, Debug)]
pub struct ProductRepository {
    resource: Resource,
}

impl ProductRepository {
    /// Create a new product repository
    pub fn new(client: ApiClient) -> Self {
        Self {
            resource: Resource::new(client, "/products"),
        }
    }

    /// List products matching `filters`
    pub async fn list(&self, filters: &ListFilters) -> ApiResult<Page<Product>> {
        let path = with_query(self.resource.path, &filters.to_query());
        self.resource.client.get(&path).await
    }

    /// Create a product
    pub async fn create(&self, payload: &ProductPayload) -> ApiResult<Option<Product>> {
        info!("Creating product: {}", payload.name);
        self.resource.client.post(self.resource.path, payload).await
    }

    /// Update a product
    pub async fn update(
        &self,
        id: &EntityId,
        payload: &ProductPayload,
    ) -> ApiResult<Option<Product>> {
        info!("Updating product: {}", id);
        self.resource.client.put(&self.resource.item(id), payload).await
    }

    /// Delete a product
    pub async fn delete(&self, id: &EntityId) -> ApiResult<()> {
        info!("Deleting product: {}", id);
        self.resource.client.delete(&self.resource.item(id)).await
    }
}
