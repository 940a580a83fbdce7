//! Client for the management API
//!
//! [`ApiClient`] owns the HTTP plumbing and the bearer token. Repositories
//! wrap it per resource, [`SessionManager`] runs login and logout, and
//! [`Cart`] builds point-of-sale sales on top of the sales repository.

pub mod cart;
pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod repositories;
pub mod session;
pub mod state;

pub use cart::{Cart, CartLine, Invoice};
pub use client::{ApiClient, RequestOptions, UnauthorizedHook};
pub use error::{ApiError, ApiResult};
pub use models::{EntityId, Page};
pub use query::{ListFilters, QueryParams, SortOrder, build_query_params};
pub use session::{LoginOutcome, SessionManager};
pub use state::Services;
