//! Handler functions for the police-OB (former police officer) track.
//!
//! Verification marks an account as a confirmed former officer and attaches
//! the `police_ob` role tag; quick onboarding records the two completion
//! markers (training, pledge) for the verified member's fast-track flow.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::middleware::{AdminUser, CurrentUser};
use crate::auth::models::SessionUser;
use crate::database::models::{ObOnboarding, Role};
use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub user_id: String,
    #[serde(default)]
    pub badge_id: Option<String>,
    #[serde(default)]
    pub document_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub user: SessionUser,
    pub police_ob_verified: bool,
}

/// Mark a member as a verified former police officer. Admin-only: the badge
/// and document references are reviewed by staff before this is called.
pub async fn verify(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let id = mongodb::bson::oid::ObjectId::parse_str(&body.user_id)
        .map_err(|_| ApiError::Validation("Invalid user id".into()))?;
    let user = state
        .store
        .find_user_by_id(&id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    state.store.set_police_ob_verified(&id).await?;
    if !user.has_role(Role::PoliceOb) {
        let mut roles = user.roles.clone();
        roles.push(Role::PoliceOb);
        state.store.set_roles(&id, &roles).await?;
    }

    let updated = state
        .store
        .find_user_by_id(&id)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    tracing::info!(
        actor = %actor.email,
        target = %updated.email,
        badge = ?body.badge_id,
        document = ?body.document_url,
        "police OB verified"
    );
    Ok(Json(VerifyResponse {
        success: true,
        user: SessionUser::from_user(&updated),
        police_ob_verified: true,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickOnboardingRequest {
    #[serde(default)]
    pub training_completed: Option<bool>,
    #[serde(default)]
    pub pledge_accepted: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickOnboardingResponse {
    pub success: bool,
    pub ob_onboarding: ObOnboarding,
    pub fast_track_eligible: bool,
}

/// Update the current member's onboarding markers. Only fields present in
/// the request change; the rest keep their stored value.
pub async fn quick_onboarding(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<QuickOnboardingRequest>,
) -> Result<Json<QuickOnboardingResponse>, ApiError> {
    if !user.police_ob_verified {
        return Err(ApiError::Forbidden("Police OB verification required".into()));
    }

    let mut onboarding = user.ob_onboarding.unwrap_or_default();
    if let Some(training) = body.training_completed {
        onboarding.training_done = training;
    }
    if let Some(pledge) = body.pledge_accepted {
        onboarding.pledge_accepted = pledge;
    }
    state.store.set_ob_onboarding(&user.id, onboarding).await?;

    let fast_track_eligible = onboarding.training_done && onboarding.pledge_accepted;
    if fast_track_eligible {
        tracing::info!(member = %user.email, "police OB fast-track requirements met");
    }
    Ok(Json(QuickOnboardingResponse {
        success: true,
        ob_onboarding: onboarding,
        fast_track_eligible,
    }))
}
