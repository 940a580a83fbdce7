//! Export consignment models

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::EntityId;

/// Lifecycle status of a consignment
///
/// Unrecognised (or missing) values read as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConsignmentStatus {
    Received,
    Processing,
    Exported,
    #[default]
    Pending,
    Acknowledged,
    Cancelled,
}

/// Display hint for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTag {
    pub label: &'static str,
    pub color: &'static str,
}

impl ConsignmentStatus {
    pub const ALL: [ConsignmentStatus; 6] = [
        ConsignmentStatus::Received,
        ConsignmentStatus::Processing,
        ConsignmentStatus::Exported,
        ConsignmentStatus::Pending,
        ConsignmentStatus::Acknowledged,
        ConsignmentStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConsignmentStatus::Received => "RECEIVED",
            ConsignmentStatus::Processing => "PROCESSING",
            ConsignmentStatus::Exported => "EXPORTED",
            ConsignmentStatus::Pending => "PENDING",
            ConsignmentStatus::Acknowledged => "ACKNOWLEDGED",
            ConsignmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parse a status name, falling back to `Pending`
    pub fn parse_lenient(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .unwrap_or(ConsignmentStatus::Pending)
    }

    pub fn tag(self) -> StatusTag {
        let color = match self {
            ConsignmentStatus::Received => "blue",
            ConsignmentStatus::Processing => "orange",
            ConsignmentStatus::Exported => "green",
            ConsignmentStatus::Pending => "default",
            ConsignmentStatus::Acknowledged => "cyan",
            ConsignmentStatus::Cancelled => "red",
        };
        StatusTag {
            label: self.as_str(),
            color,
        }
    }

    /// Exported consignments are final and offer no further status change
    pub fn allows_status_change(self) -> bool {
        self != ConsignmentStatus::Exported
    }
}

impl fmt::Display for ConsignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConsignmentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConsignmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .map(ConsignmentStatus::parse_lenient)
            .unwrap_or_default())
    }
}

/// Supplier attached to a consignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Product line of a consignment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentItem {
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
}

/// Export consignment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consignment {
    pub id: EntityId,
    pub supplier: Option<Supplier>,
    #[serde(default)]
    pub items: Vec<ConsignmentItem>,
    pub received_date: Option<String>,
    #[serde(default)]
    pub status: ConsignmentStatus,
    pub value: Option<f64>,
}

/// Body of a status change
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ConsignmentStatus,
}

/// Headline counts over a list of consignments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsignmentSummary {
    pub total: usize,
    pub received: usize,
    pub exported: usize,
    pub processing: usize,
}

impl ConsignmentSummary {
    pub fn from_consignments(consignments: &[Consignment]) -> Self {
        let count = |status| consignments.iter().filter(|c| c.status == status).count();
        ConsignmentSummary {
            total: consignments.len(),
            received: count(ConsignmentStatus::Received),
            exported: count(ConsignmentStatus::Exported),
            processing: count(ConsignmentStatus::Processing),
        }
    }
}
