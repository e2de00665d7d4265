//! Defines the HTTP routes for the police-OB track.

use axum::routing::post;
use axum::Router;

use crate::state::AppState;

use super::handlers;

pub fn police_ob_router() -> Router<AppState> {
    Router::new()
        .route("/verify", post(handlers::verify))
        .route("/quick-onboarding", post(handlers::quick_onboarding))
}
