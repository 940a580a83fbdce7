//! Common library for the management console
//!
//! This crate provides the pieces of client state shared by the other
//! crates: durable key/value storage, the bearer token slot, display
//! preferences and client configuration.

pub mod config;
pub mod error;
pub mod preferences;
pub mod storage;
pub mod token;

/// Example usage of the storage and token modules
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use common::config::ClientConfig;
/// use common::storage::{FileStore, KeyValueStore};
/// use common::token::TokenStore;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::from_env()?;
///     let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.state_file)?);
///     let tokens = TokenStore::new(store)?;
///     println!("Token present: {}", tokens.is_present());
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
