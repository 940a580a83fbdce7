//! Session lifecycle: login, restore, logout
//!
//! The session is derived from the token the backend issues at login, never
//! from a user object in the response. It is mirrored to storage under the
//! `user` key so a restart can restore it without a round trip, and it ends
//! as soon as the token is gone, whether by logout or by a 401.

use std::sync::{Arc, RwLock};

use auth::gate::{self, FeatureArea};
use auth::validation::validate_login;
use auth::{Permission, Session, SessionDecoder};
use common::error::StorageError;
use common::storage::{KeyValueStore, USER_KEY};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

/// Login endpoint path
pub const LOGIN_PATH: &str = "/auth/login";

/// Request for user login
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response for user login
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: Option<u64>,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_in: Option<u64>,
    pub session: Session,
}

/// Session manager owning the current session
pub struct SessionManager {
    client: ApiClient,
    decoder: SessionDecoder,
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(client: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client,
            decoder: SessionDecoder::new(),
            store,
            current: RwLock::new(None),
        }
    }

    fn replace_current(&self, session: Option<Session>) -> Option<Session> {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *current, session)
    }

    /// Authenticate against the backend and start a session
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginOutcome> {
        validate_login(username, password)?;
        info!("Login attempt for user: {}", username);

        let response: LoginResponse = self
            .client
            .post(LOGIN_PATH, &LoginRequest { username, password })
            .await?
            .ok_or(ApiError::EmptyPayload)?;

        self.client.tokens().set(Some(response.token.as_str()))?;

        let session = match self.decoder.decode(&response.token) {
            Ok(session) => session,
            Err(e) => {
                warn!("Issued token carries no usable session; forcing re-login");
                self.end_session()?;
                return Err(e.into());
            }
        };

        let serialized = serde_json::to_string(&session).map_err(StorageError::from)?;
        self.store.set(USER_KEY, &serialized)?;
        self.replace_current(Some(session.clone()));

        info!("Login successful for user: {}", session.username);

        Ok(LoginOutcome {
            token: response.token,
            expires_in: response.expires_in,
            session,
        })
    }

    /// Pick up the session persisted by a previous run, if any
    ///
    /// Both the token and the user entry must be present. An unreadable user
    /// entry ends the session.
    pub fn restore(&self) -> ApiResult<Option<Session>> {
        if !self.client.tokens().is_present() {
            return Ok(None);
        }

        let Some(raw) = self.store.get(USER_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                info!("Restored session for user: {}", session.username);
                self.replace_current(Some(session.clone()));
                Ok(Some(session))
            }
            Err(e) => {
                warn!("Discarding unreadable persisted session: {}", e);
                self.end_session()?;
                Ok(None)
            }
        }
    }

    /// End the session; display preferences are kept
    pub fn logout(&self) -> ApiResult<()> {
        if let Some(session) = self.replace_current(None) {
            info!("Logging out user: {}", session.username);
        }
        self.end_session()
    }

    fn end_session(&self) -> ApiResult<()> {
        self.replace_current(None);
        self.client.tokens().clear()?;
        self.store.delete(USER_KEY)?;
        Ok(())
    }

    /// The live session, if any
    ///
    /// Returns `None` once the token has been cleared, including when a 401
    /// cleared it behind the manager's back.
    pub fn current(&self) -> Option<Session> {
        if !self.client.tokens().is_present() {
            if self.replace_current(None).is_some() {
                info!("Session ended because the bearer token was cleared");
                if let Err(e) = self.store.delete(USER_KEY) {
                    warn!("Failed to remove persisted session: {}", e);
                }
            }
            return None;
        }

        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Whether the live session may see a feature guarded by `required`
    pub fn has_permission(&self, required: &Permission) -> bool {
        gate::has_permission(self.current().as_ref(), required)
    }

    /// Feature areas the live session may see
    pub fn visible_areas(&self) -> Vec<FeatureArea> {
        gate::visible_areas(self.current().as_ref())
    }
}
