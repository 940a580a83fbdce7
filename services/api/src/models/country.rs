//! Country configuration models

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Country known to the export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: Option<EntityId>,
    pub name: String,
    pub code: Option<String>,
}
