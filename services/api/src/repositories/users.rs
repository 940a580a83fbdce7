//! User administration repository

use tracing::info;

use super::Resource;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::user::{UserAccount, UserPayload};
use crate::models::{EntityId, Page};
use crate::query::{ListFilters, with_query};

/// User repository
#[derive(Clone, Debug)]
pub struct UserRepository {
    resource: Resource,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(client: ApiClient) -> Self {
        Self {
            resource: Resource::new(client, "/users"),
        }
    }

    /// List user accounts
    pub async fn list(&self, filters: &ListFilters) -> ApiResult<Page<UserAccount>> {
        let path = with_query(self.resource.path, &filters.to_query());
        self.resource.client.get(&path).await
    }

    /// Create a user account
    pub async fn create(&self, payload: &UserPayload) -> ApiResult<Option<UserAccount>> {
        payload.validate(true)?;
        info!("Creating user: {}", payload.username);
        self.resource.client.post(self.resource.path, payload).await
    }

    /// Update a user account
    pub async fn update(
        &self,
        id: &EntityId,
        payload: &UserPayload,
    ) -> ApiResult<Option<UserAccount>> {
        payload.validate(false)?;
        info!("Updating user: {}", id);
        self.resource.client.put(&self.resource.item(id), payload).await
    }
}
