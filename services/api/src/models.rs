//! API models for request and response payloads
//!
//! Field names follow the backend's camelCase wire format. Response models
//! are lenient: optional fields the backend may omit are `Option`s.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

pub mod category;
pub mod consignment;
pub mod country;
pub mod product;
pub mod sale;
pub mod transaction;
pub mod user;

/// Backend identifier; numeric or textual depending on the resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(id) => f.pad(&id.to_string()),
            EntityId::Text(id) => f.pad(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Number(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::Text(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId::Text(id)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    /// Integers become `Number`, everything else `Text`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(id) => EntityId::Number(id),
            Err(_) => EntityId::Text(s.to_string()),
        })
    }
}

/// One page of a list endpoint
///
/// Accepts either a bare JSON array or an object carrying a `content` array
/// and a `totalElements` or `total` count. Without a count, the number of
/// returned items is used.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Normalise a list payload
    pub fn from_value(value: Value) -> ApiResult<Self> {
        match value {
            Value::Array(_) => {
                let content: Vec<T> = serde_json::from_value(value)?;
                let total = content.len() as u64;
                Ok(Page { content, total })
            }
            Value::Object(mut fields) => {
                let content = fields.remove("content").ok_or_else(|| {
                    ApiError::InvalidPayload("list response has no `content` array".to_string())
                })?;
                let content: Vec<T> = serde_json::from_value(content)?;
                let total = fields
                    .get("totalElements")
                    .and_then(Value::as_u64)
                    .or_else(|| fields.get("total").and_then(Value::as_u64))
                    .unwrap_or(content.len() as u64);
                Ok(Page { content, total })
            }
            other => Err(ApiError::InvalidPayload(format!(
                "expected a list response, got {}",
                other
            ))),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Page::from_value(value).map_err(serde::de::Error::custom)
    }
}
