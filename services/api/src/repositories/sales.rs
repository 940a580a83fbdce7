//! Sales repository

use tracing::info;

use super::Resource;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::Page;
use crate::models::sale::{NewSale, Sale};
use crate::query::{ListFilters, with_query};

/// Sale repository
#[derive(Clone, Debug)]
pub struct SaleRepository {
    resource: Resource,
}

impl SaleRepository {
    /// Create a new sale repository
    pub fn new(client: ApiClient) -> Self {
        Self {
            resource: Resource::new(client, "/sales"),
        }
    }

    /// List recorded sales
    pub async fn list(&self, filters: &ListFilters) -> ApiResult<Page<Sale>> {
        let path = with_query(self.resource.path, &filters.to_query());
        self.resource.client.get(&path).await
    }

    /// Record a sale
    pub async fn create(&self, sale: &NewSale) -> ApiResult<Option<Sale>> {
        info!(
            "Recording sale of {} line(s), total {:.2}",
            sale.items.len(),
            sale.total
        );
        self.resource.client.post(self.resource.path, sale).await
    }
}
