//! Accounting ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
    #[default]
    #[serde(other)]
    Other,
}

/// Recorded ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: EntityId,
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: TransactionType,
    #[serde(default)]
    pub amount: f64,
    pub payment_method: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// Ledger entry creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub description: String,
    pub amount: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Money in, money out and the difference
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LedgerTotals {
    pub paid_out: f64,
    pub received: f64,
    pub net: f64,
}

impl LedgerTotals {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let sum = |kind| {
            transactions
                .iter()
                .filter(|t| t.kind == kind)
                .map(|t| t.amount)
                .sum::<f64>()
        };

        let paid_out = sum(TransactionType::Expense);
        let received = sum(TransactionType::Income);
        LedgerTotals {
            paid_out,
            received,
            net: received - paid_out,
        }
    }
}
