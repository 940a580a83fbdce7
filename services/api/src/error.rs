//! Custom error types for the API client

use auth::AuthError;
use common::error::StorageError;
use thiserror::Error;

/// Message used when a failed response carries nothing more useful
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// Custom error type for the API client
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend rejected the bearer token; the token has been cleared
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-success status, with the best human-readable message
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The backend could not be reached or the transfer failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response whose body is not the expected JSON
    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),

    /// A success response without a body where one was required
    #[error("Response carried no payload")]
    EmptyPayload,

    /// A token that does not decode into a session, or input failing validation
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Persisted client state could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input rejected before any request was sent
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// HTTP status for errors that came from a backend response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::InvalidPayload(e.to_string())
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
