//! Defines the HTTP routes for administrative member management.
//!
//! All routes require admin-level access via the `AdminUser` extractor; the
//! per-rule authorization happens inside the handlers once the target record
//! is known.

use axum::routing::{delete, get, patch};
use axum::Router;

use crate::state::AppState;

use super::handlers;

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/members", get(handlers::list_members))
        .route("/members/:id", delete(handlers::delete_member))
        .route("/members/:id/role", patch(handlers::update_role))
        .route("/members/:id/status", patch(handlers::update_status))
        .route("/members/:id/plan", patch(handlers::update_plan))
}
