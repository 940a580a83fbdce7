//! Client configuration
//!
//! Values are layered: built-in defaults, then an optional configuration
//! file, then `CONSOLE_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default management API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:9051/api/management-service";
/// Default location of the persisted client state
pub const DEFAULT_STATE_FILE: &str = ".console/state.json";

/// Configuration for the management API client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// File backing the persisted token, user and theme entries
    pub state_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig from environment variables
    ///
    /// # Environment Variables
    /// - `CONSOLE_BASE_URL`: API base URL (default: `DEFAULT_BASE_URL`)
    /// - `CONSOLE_STATE_FILE`: persisted state file (default: `DEFAULT_STATE_FILE`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load configuration, reading `file` first when given
    ///
    /// A missing file is not an error; environment variables still apply.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("state_file", DEFAULT_STATE_FILE)?;

        if let Some(file) = file {
            builder = builder.add_source(File::from(file).required(false));
        }

        let mut loaded: ClientConfig = builder
            .add_source(Environment::with_prefix("CONSOLE"))
            .build()?
            .try_deserialize()?;

        loaded.base_url = loaded.base_url.trim_end_matches('/').to_string();
        if loaded.base_url.is_empty() {
            return Err(ConfigError::Message("base_url must not be empty".to_string()));
        }

        Ok(loaded)
    }
}
