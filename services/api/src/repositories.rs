//! Repositories for the management API resources
//!
//! Each repository is a thin pass-through to [`ApiClient`] with a fixed path
//! and method per operation. List operations merge the caller's filters into
//! the query string.

use crate::client::ApiClient;
use crate::models::EntityId;

pub mod categories;
pub mod consignments;
pub mod countries;
pub mod products;
pub mod sales;
pub mod transactions;
pub mod users;

pub use categories::CategoryRepository;
pub use consignments::ConsignmentRepository;
pub use countries::CountryRepository;
pub use products::ProductRepository;
pub use sales::SaleRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

/// Path of a single resource below `collection`
fn item_path(collection: &str, id: &EntityId) -> String {
    format!(
        "{}/{}",
        collection,
        urlencoding::encode(&id.to_string())
    )
}

/// Shared state of every repository
#[derive(Clone, Debug)]
struct Resource {
    client: ApiClient,
    path: &'static str,
}

impl Resource {
    fn new(client: ApiClient, path: &'static str) -> Self {
        Self { client, path }
    }

    fn item(&self, id: &EntityId) -> String {
        item_path(self.path, id)
    }
}
