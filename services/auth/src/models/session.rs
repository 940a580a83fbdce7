//! Session model and related functionality

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::permission::{Permission, grants};

/// Role assumed when the token carries no `type` claim
pub const DEFAULT_ROLE: &str = "USER";

/// Authenticated identity derived from a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Backend identifier of the user (`identifier` claim)
    pub subject_id: Option<String>,
    /// Login name (`sub` claim)
    pub username: String,
    /// Role (`type` claim)
    pub role: String,
    /// Granted permissions
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
}

impl Session {
    /// Whether this session may use a feature guarded by `required`
    pub fn can(&self, required: &Permission) -> bool {
        grants(&self.permissions, required)
    }

    pub fn is_admin(&self) -> bool {
        self.permissions.contains(&Permission::Admin)
    }
}
