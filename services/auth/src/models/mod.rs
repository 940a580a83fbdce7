//! Authorization models

pub mod permission;
pub mod session;

// Re-export for convenience
pub use permission::{Permission, grants};
pub use session::{DEFAULT_ROLE, Session};
