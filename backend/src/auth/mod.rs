//! Authentication module for managing user accounts, sessions, and access control.
//!
//! This module provides the public interface for authentication-related
//! functionality: login, registration, session token issuance and
//! verification, the authorization policy for administrative actions, and
//! the extractors that protect routes.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use errors::*;
pub use handlers::*;
pub use middleware::*;
pub use models::*;
pub use policy::*;
pub use routes::*;
pub use service::*;
