//! Defines the HTTP routes specifically for authentication.
//!
//! Login, logout, registration and the OAuth handoff landing. The session
//! probe lives under `/api/auth-simple` and is wired in the top-level router.

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

use super::handlers;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/register", post(handlers::register))
        .route("/oauth-success", get(handlers::oauth_success))
}
