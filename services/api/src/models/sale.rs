//! Sales models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EntityId;

/// Line of a sale being recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: EntityId,
    pub quantity: u32,
    pub price: f64,
}

/// Sale creation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub items: Vec<SaleItem>,
    pub total: f64,
    pub date: DateTime<Utc>,
}

/// Recorded sale
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: EntityId,
    pub total: Option<f64>,
    pub date: Option<String>,
    #[serde(default)]
    pub items: Vec<Value>,
}
