//! Extractors protecting authenticated routes.
//!
//! `CurrentUser` resolves the session cookie to a live user record;
//! `AdminUser` additionally requires admin-level access. Both run per
//! request, so a role change takes effect on the next request even while an
//! older token is still live.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use crate::database::models::User;
use crate::errors::ApiError;
use crate::state::AppState;

use super::errors::AuthError;
use super::service;

pub struct CurrentUser(pub User);

pub struct AdminUser(pub User);

async fn resolve(parts: &mut Parts, state: &AppState) -> Result<User, ApiError> {
    let jar = match CookieJar::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(err) => match err {},
    };
    service::resolve_session(state.store.as_ref(), &state.config.jwt_secret, &jar).await
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        Ok(CurrentUser(resolve(parts, state).await?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let user = resolve(parts, state).await?;
        if !user.has_admin_access() {
            return Err(AuthError::AdminRequired.into());
        }
        Ok(AdminUser(user))
    }
}
