//! Point-of-sale cart
//!
//! Lines keep the order products were first added in. A line never holds a
//! quantity below one: lowering it to zero or less removes the line.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::models::EntityId;
use crate::models::product::Product;
use crate::models::sale::{NewSale, SaleItem};
use crate::repositories::SaleRepository;

/// One product in the cart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: EntityId,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Receipt of a completed checkout
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    /// Identifier the backend assigned to the sale, when it returned one
    pub invoice_number: Option<EntityId>,
    pub sale: NewSale,
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add one unit of `product`
    pub fn add(&mut self, product: &Product) {
        self.add_item(product.id.clone(), &product.name, product.selling_price());
    }

    /// Add one unit of an arbitrary item; repeated adds bump the quantity
    pub fn add_item(&mut self, product_id: EntityId, name: &str, unit_price: f64) {
        match self.lines.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                product_id,
                name: name.to_string(),
                unit_price,
                quantity: 1,
            }),
        }
    }

    /// Set the quantity of a line; zero or less removes it
    pub fn update_quantity(&mut self, product_id: &EntityId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
        {
            line.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product_id: &EntityId) {
        self.lines.retain(|line| &line.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of unit price × quantity over all lines
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sale payload for the current lines, stamped with `date`
    pub fn to_sale(&self, date: DateTime<Utc>) -> ApiResult<NewSale> {
        if self.is_empty() {
            return Err(ApiError::Validation("Cart is empty".to_string()));
        }

        Ok(NewSale {
            items: self
                .lines
                .iter()
                .map(|line| SaleItem {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                    price: line.unit_price,
                })
                .collect(),
            total: self.total(),
            date,
        })
    }

    /// Record the cart as a sale; the cart is emptied whenever the backend
    /// accepted it, even if its answer carries no sale
    pub async fn checkout(&mut self, sales: &SaleRepository, date: DateTime<Utc>) -> ApiResult<Invoice> {
        let sale = self.to_sale(date)?;
        let recorded = match sales.create(&sale).await {
            Ok(recorded) => recorded,
            Err(ApiError::InvalidPayload(reason)) => {
                warn!("Sale accepted with an unreadable response: {}", reason);
                None
            }
            Err(e) => return Err(e),
        };

        let invoice = Invoice {
            invoice_number: recorded.map(|sale| sale.id),
            sale,
            lines: std::mem::take(&mut self.lines),
        };
        info!(
            "Sale completed, invoice {}",
            invoice
                .invoice_number
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "(unassigned)".to_string())
        );

        Ok(invoice)
    }
}
