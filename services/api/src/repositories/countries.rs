//! Country configuration repository

use super::Resource;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::Page;
use crate::models::country::Country;
use crate::query::{ListFilters, with_query};

/// Country repository
#[derive(Clone, Debug)]
pub struct CountryRepository {
    resource: Resource,
}

impl CountryRepository {
    pub fn new(client: ApiClient) -> Self {
        Self {
            resource: Resource::new(client, "/configurations/countries"),
        }
    }

    /// List configured countries
    pub async fn list(&self, filters: &ListFilters) -> ApiResult<Page<Country>> {
        let path = with_query(self.resource.path, &filters.to_query());
        self.resource.client.get(&path).await
    }
}
