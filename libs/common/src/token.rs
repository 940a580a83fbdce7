//! Bearer token slot

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::error::StorageResult;
use crate::storage::{KeyValueStore, TOKEN_KEY};

/// Holds at most one bearer token, mirrored to durable storage
///
/// Cloning yields another handle to the same slot. Writes are last-write-wins.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
    slot: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    /// Create a token store, picking up any token persisted by a previous run
    pub fn new(store: Arc<dyn KeyValueStore>) -> StorageResult<Self> {
        let persisted = store.get(TOKEN_KEY)?.filter(|token| !token.is_empty());
        if persisted.is_some() {
            info!("Restored persisted bearer token");
        }

        Ok(Self {
            store,
            slot: Arc::new(RwLock::new(persisted)),
        })
    }

    /// Current token, if any
    pub fn get(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the token; `None` (or an empty string) clears it
    ///
    /// The in-memory slot is updated before the durable write, so a failed
    /// write never leaves a cleared token usable in this process.
    pub fn set(&self, token: Option<&str>) -> StorageResult<()> {
        let token = token.filter(|token| !token.is_empty());
        {
            let mut slot = self
                .slot
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *slot = token.map(str::to_string);
        }

        match token {
            Some(token) => self.store.set(TOKEN_KEY, token),
            None => self.store.delete(TOKEN_KEY),
        }
    }

    /// Shorthand for `set(None)`
    pub fn clear(&self) -> StorageResult<()> {
        self.set(None)
    }

    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("present", &self.is_present())
            .finish()
    }
}
