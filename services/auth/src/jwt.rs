//! Session decoding from bearer tokens
//!
//! The management backend issues JWTs whose claims carry everything the
//! console needs for navigation gating: the login name (`sub`), the role
//! (`type`), the permission list and the user identifier. The console reads
//! those claims without checking the signature; every request is still
//! authorized by the backend, so a forged token only changes what the
//! console displays.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::AuthResult;
use crate::models::{DEFAULT_ROLE, Permission, Session};

/// Claims read from a management API token
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Login name
    pub sub: String,
    /// Role
    #[serde(rename = "type", default)]
    pub role: Option<String>,
    /// Granted permissions
    #[serde(default)]
    pub permissions: Option<Vec<Permission>>,
    /// Backend user identifier
    #[serde(default)]
    pub identifier: Option<Identifier>,
    /// Issued at time
    #[serde(default)]
    pub iat: Option<u64>,
    /// Expiration time
    #[serde(default)]
    pub exp: Option<u64>,
}

/// User identifiers arrive either as numbers or as strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
}

impl Identifier {
    fn into_string(self) -> String {
        match self {
            Identifier::Number(id) => id.to_string(),
            Identifier::Text(id) => id,
        }
    }
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Session {
            subject_id: claims.identifier.map(Identifier::into_string),
            username: claims.sub,
            role: claims.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            permissions: claims.permissions.unwrap_or_default().into_iter().collect(),
        }
    }
}

/// Turns bearer tokens into [`Session`]s
#[derive(Clone)]
pub struct SessionDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl SessionDecoder {
    /// Initialize a decoder that reads claims without verifying signatures
    pub fn new() -> Self {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        SessionDecoder {
            key: DecodingKey::from_secret(&[]),
            validation,
        }
    }

    /// Read the claims of `token`
    pub fn claims(&self, token: &str) -> AuthResult<Claims> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            warn!("Failed to decode bearer token: {}", e);
            e
        })?;
        Ok(data.claims)
    }

    /// Derive the session carried by `token`
    pub fn decode(&self, token: &str) -> AuthResult<Session> {
        let session = Session::from(self.claims(token)?);
        debug!(
            "Decoded session for {} with role {} and {} permission(s)",
            session.username,
            session.role,
            session.permissions.len()
        );
        Ok(session)
    }
}

impl Default for SessionDecoder {
    fn default() -> Self {
        Self::new()
    }
}
