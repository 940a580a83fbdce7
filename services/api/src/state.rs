//! Repositories shared across commands

use crate::client::ApiClient;
use crate::repositories::{
    CategoryRepository, ConsignmentRepository, CountryRepository, ProductRepository,
    SaleRepository, TransactionRepository, UserRepository,
};

/// Every resource repository, bound to one client
#[derive(Clone, Debug)]
pub struct Services {
    pub products: ProductRepository,
    pub categories: CategoryRepository,
    pub countries: CountryRepository,
    pub sales: SaleRepository,
    pub consignments: ConsignmentRepository,
    pub users: UserRepository,
    pub transactions: TransactionRepository,
}

impl Services {
    pub fn new(client: ApiClient) -> Self {
        Self {
            products: ProductRepository::new(client.clone()),
            categories: CategoryRepository::new(client.clone()),
            countries: CountryRepository::new(client.clone()),
            sales: SaleRepository::new(client.clone()),
            consignments: ConsignmentRepository::new(client.clone()),
            users: UserRepository::new(client.clone()),
            transactions: TransactionRepository::new(client),
        }
    }
}
