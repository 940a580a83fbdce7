//! Session and authorization primitives for the management console
//!
//! This crate derives a [`Session`](models::Session) from a bearer token,
//! models permissions as a closed vocabulary with an `ADMIN` wildcard, and
//! answers "may this session see that feature" questions.

pub mod error;
pub mod gate;
pub mod jwt;
pub mod models;
pub mod validation;

pub use error::{AuthError, AuthResult};
pub use gate::{FeatureArea, has_permission, visible_areas};
pub use jwt::SessionDecoder;
pub use models::{Permission, Session, grants};
