//! Handler functions for authentication-related API endpoints.
//!
//! Login, logout, registration, the session probe used by the UI to gate
//! admin screens client-side, and the OAuth redirect handoff. Cookie
//! attributes follow the session contract: http-only, secure in production,
//! SameSite=Lax, root path, seven-day max-age.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::database::models::User;
use crate::errors::ApiError;
use crate::state::AppState;

use super::errors::AuthError;
use super::models::{LoginRequest, RegisterRequest, SessionUser};
use super::service::{self, SESSION_COOKIE};

fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_secure(production);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::days(7));
    cookie
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: SessionUser,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let user = service::authenticate(state.store.as_ref(), &body.email, &body.password).await?;
    let token = service::issue_token(&state.config.jwt_secret, &user)?;
    state.store.touch_last_access(&user.id).await?;

    tracing::info!(email = %user.email, "login");
    let jar = jar.add(session_cookie(token, state.config.production));
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            user: SessionUser::from_user(&user),
        }),
    ))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    // The removal must carry the same path the cookie was issued with, and
    // must go out even when the request carried no cookie, so a stale token
    // in the browser is cleared either way.
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();
    let jar = jar.add(removal);
    (jar, Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: SessionUser,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation(
            "Name, email and password are required".into(),
        ));
    }
    if body.password.chars().count() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }

    if state
        .store
        .find_user_by_email(&body.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "This email address is already registered".into(),
        ));
    }

    let password_hash =
        bcrypt::hash(&body.password, bcrypt::DEFAULT_COST).map_err(AuthError::Hash)?;
    let user = User::new(&body.name, &body.email, password_hash);
    state.store.insert_user(&user).await?;

    tracing::info!(email = %user.email, "account created");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created".into(),
            user: SessionUser::from_user(&user),
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: SessionUser,
}

/// Current session or JSON `null`. Never an error status: the UI polls this
/// to decide what to render, and the server-side checks on each admin
/// endpoint remain the real gate.
pub async fn session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Json<Option<SessionResponse>> {
    let resolved =
        service::resolve_session(state.store.as_ref(), &state.config.jwt_secret, &jar).await;
    match resolved {
        Ok(user) => Json(Some(SessionResponse {
            user: SessionUser::from_user(&user),
        })),
        Err(_) => Json(None),
    }
}

#[derive(Debug, Deserialize)]
pub struct HandoffQuery {
    #[serde(default)]
    pub state: Option<String>,
}

/// Complete an OAuth login: redeem the signed state token from the redirect
/// URL, look the account up, set the session cookie and send the member to
/// their page. Any failure lands on the error page instead of a half-open
/// session.
pub async fn oauth_success(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<HandoffQuery>,
) -> impl IntoResponse {
    let denied = Redirect::to("/auth/error?error=AccessDenied");

    let Some(claims) = query
        .state
        .as_deref()
        .and_then(|token| service::redeem_handoff_token(&state.config.jwt_secret, token))
    else {
        return denied.into_response();
    };

    let user = match state.store.find_user_by_email(&claims.email).await {
        Ok(Some(user)) => user,
        _ => return denied.into_response(),
    };

    let Ok(token) = service::issue_token(&state.config.jwt_secret, &user) else {
        return denied.into_response();
    };

    tracing::info!(email = %user.email, "oauth login");
    let jar = jar.add(session_cookie(token, state.config.production));
    (jar, Redirect::to("/mypage")).into_response()
}
