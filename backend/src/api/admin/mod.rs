//! Administrative member management API.

pub mod handlers;
pub mod routes;
