//! Product catalog models

use serde::{Deserialize, Serialize};

use super::EntityId;

fn active_by_default() -> bool {
    true
}

/// Product as returned by the catalog endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub sku: Option<String>,
    pub category_name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<f64>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub stock: Option<i64>,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

impl Product {
    /// Selling price; catalog listings use `unitPrice`, older payloads `price`
    pub fn selling_price(&self) -> f64 {
        self.unit_price.or(self.price).unwrap_or_default()
    }

    /// Case-insensitive match on name or SKU; an empty term matches everything
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        self.name.to_lowercase().contains(&term)
            || self
                .sku
                .as_deref()
                .is_some_and(|sku| sku.to_lowercase().contains(&term))
    }
}

/// Products of `products` matching `term`, in their original order
pub fn search<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| product.matches_search(term))
        .collect()
}

/// Product creation/update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    pub active: bool,
}
