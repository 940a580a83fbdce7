//! Custom error types for the authorization crate

use thiserror::Error;

/// Custom error type for session and input handling
#[derive(Error, Debug)]
pub enum AuthError {
    /// The bearer token could not be decoded into a session
    #[error("Token decode error: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),

    /// Input rejected before reaching the backend
    #[error("{0}")]
    Validation(String),
}

/// Type alias for authorization results
pub type AuthResult<T> = Result<T, AuthError>;
