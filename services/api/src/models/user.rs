//! Managed user account models

use auth::Permission;
use auth::error::AuthResult;
use auth::validation::{validate_email, validate_password, validate_username};
use serde::{Deserialize, Serialize};

use super::EntityId;

fn active_by_default() -> bool {
    true
}

/// User account as listed by user administration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: EntityId,
    pub name: Option<String>,
    pub username: String,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

/// User creation/update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub username: String,
    pub email: String,
    /// Required when creating; omitted on update to keep the current password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: String,
    pub permissions: Vec<Permission>,
    pub active: bool,
}

impl UserPayload {
    /// Check the payload before it is sent
    ///
    /// Username and a well-formed email are always required. A password is
    /// required only when `creating`.
    pub fn validate(&self, creating: bool) -> AuthResult<()> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        match self.password.as_deref() {
            Some(password) => validate_password(password),
            None if creating => validate_password(""),
            None => Ok(()),
        }
    }
}
