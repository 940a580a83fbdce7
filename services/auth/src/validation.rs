//! Input validation utilities
//!
//! Checks run before a request leaves the console so obviously bad input
//! never costs a round trip.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AuthError, AuthResult};

fn invalid(message: &str) -> AuthError {
    AuthError::Validation(message.to_string())
}

/// Validate login credentials; both fields are required
pub fn validate_login(username: &str, password: &str) -> AuthResult<()> {
    if username.trim().is_empty() {
        return Err(invalid("Please enter your username"));
    }

    if password.is_empty() {
        return Err(invalid("Please enter your password"));
    }

    Ok(())
}

/// Validate a username for a managed user account
///
/// The backend owns the naming rules; only presence is checked here.
pub fn validate_username(username: &str) -> AuthResult<()> {
    if username.trim().is_empty() {
        return Err(invalid("Username is required"));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> AuthResult<()> {
    if email.is_empty() {
        return Err(invalid("Email is required"));
    }

    if email.len() > 254 {
        return Err(invalid("Email must be at most 254 characters long"));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(invalid("Invalid email format"));
    }

    Ok(())
}

/// Validate a password being set on a managed user account
pub fn validate_password(password: &str) -> AuthResult<()> {
    if password.is_empty() {
        return Err(invalid("Password is required"));
    }

    Ok(())
}
