//! Display preferences persisted alongside the session
//!
//! Preferences outlive logout: only the token and user entries are cleared
//! when a session ends.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StorageResult;
use crate::storage::{KeyValueStore, THEME_KEY};

/// Theme preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreferences {
    pub primary_color: String,
    pub secondary_color: String,
    pub company_name: String,
}

impl Default for ThemePreferences {
    fn default() -> Self {
        Self {
            primary_color: "#6366f1".to_string(),
            secondary_color: "#8b5cf6".to_string(),
            company_name: "MyCompany".to_string(),
        }
    }
}

/// Partial theme update; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeUpdate {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub company_name: Option<String>,
}

impl ThemePreferences {
    /// Apply a partial update on top of these preferences
    pub fn merge(mut self, update: ThemeUpdate) -> Self {
        if let Some(primary_color) = update.primary_color {
            self.primary_color = primary_color;
        }
        if let Some(secondary_color) = update.secondary_color {
            self.secondary_color = secondary_color;
        }
        if let Some(company_name) = update.company_name {
            self.company_name = company_name;
        }
        self
    }

    /// First character of the company name, used where the full name does not fit
    pub fn monogram(&self) -> Option<char> {
        self.company_name.chars().next()
    }
}

/// Loads and saves [`ThemePreferences`]
#[derive(Clone)]
pub struct ThemeStore {
    store: Arc<dyn KeyValueStore>,
}

impl ThemeStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persisted preferences, or the defaults when none (or garbage) are stored
    pub fn load(&self) -> StorageResult<ThemePreferences> {
        let Some(raw) = self.store.get(THEME_KEY)? else {
            return Ok(ThemePreferences::default());
        };

        match serde_json::from_str(&raw) {
            Ok(theme) => Ok(theme),
            Err(e) => {
                warn!("Ignoring unreadable theme preferences: {}", e);
                Ok(ThemePreferences::default())
            }
        }
    }

    /// Merge `update` into the stored preferences and persist the result
    pub fn update(&self, update: ThemeUpdate) -> StorageResult<ThemePreferences> {
        let theme = self.load()?.merge(update);
        self.store.set(THEME_KEY, &serde_json::to_string(&theme)?)?;
        Ok(theme)
    }
}
