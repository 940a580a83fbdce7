//! Accounting ledger repository

use super::Resource;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::Page;
use crate::models::transaction::{NewTransaction, Transaction};
use crate::query::{ListFilters, with_query};

/// Transaction repository
#[derive(Clone, Debug)]
pub struct TransactionRepository {
    resource: Resource,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(client: ApiClient) -> Self {
        Self {
            resource: Resource::new(client, "/accounting/transactions"),
        }
    }

    /// List ledger entries
    pub async fn list(&self, filters: &ListFilters) -> ApiResult<Page<Transaction>> {
        let path = with_query(self.resource.path, &filters.to_query());
        self.resource.client.get(&path).await
    }

    /// Record a ledger entry
    pub async fn create(&self, entry: &NewTransaction) -> ApiResult<Option<Transaction>> {
        self.resource.client.post(self.resource.path, entry).await
    }
}
