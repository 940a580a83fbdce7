//! Export consignment repository

use tracing::info;

use super::Resource;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::consignment::{Consignment, ConsignmentStatus, StatusUpdate};
use crate::models::{EntityId, Page};
use crate::query::{ListFilters, with_query};

/// Consignment repository
#[derive(Clone, Debug)]
pub struct ConsignmentRepository {
    resource: Resource,
}

impl ConsignmentRepository {
    /// Create a new consignment repository
    pub fn new(client: ApiClient) -> Self {
        Self {
            resource: Resource::new(client, "/consignments"),
        }
    }

    /// List consignments
    pub async fn list(&self, filters: &ListFilters) -> ApiResult<Page<Consignment>> {
        let path = with_query(self.resource.path, &filters.to_query());
        self.resource.client.get(&path).await
    }

    /// Move a consignment to `status`
    pub async fn update_status(
        &self,
        id: &EntityId,
        status: ConsignmentStatus,
    ) -> ApiResult<Option<Consignment>> {
        info!("Updating consignment {} to {}", id, status);
        let path = format!("{}/status", self.resource.item(id));
        self.resource
            .client
            .put(&path, &StatusUpdate { status })
            .await
    }
}
