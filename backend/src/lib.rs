//! Backend for the detective academy membership site.
//!
//! Course catalog, member accounts with role-based access control, plan
//! subscriptions and the police-OB track, served as an Axum JSON API over a
//! MongoDB document store. Router assembly lives here so integration tests
//! can drive the exact production routing against the in-memory store.

use axum::routing::get;
use axum::Router;

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod state;

use state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/api/auth", auth::routes::auth_router())
        .route("/api/auth-simple/session", get(auth::handlers::session))
        .nest("/api/admin", api::admin::routes::admin_router())
        .nest("/api/police-ob", api::police_ob::routes::police_ob_router())
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Welcome to the Detective Academy API!"
}
