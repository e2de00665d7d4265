//! Handler functions for administrative member management.
//!
//! Every mutation follows the same shape: resolve the acting admin, re-fetch
//! the target record, run the authorization policy, persist a single-document
//! update, and return the freshly-read result. Tokens issued before a
//! mutation keep their old embedded claims until they expire; these handlers
//! always decide from the current database state.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AdminUser;
use crate::auth::models::{apply_effective_role, effective_role, EffectiveRole};
use crate::auth::policy::{self, AdminAction};
use crate::database::models::{
    AccountStatus, Course, PlanAssignment, Profile, Role, User,
};
use crate::errors::ApiError;
use crate::state::AppState;

fn parse_member_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::Validation("Invalid user id".into()))
}

async fn fetch_target(state: &AppState, id: &ObjectId) -> Result<User, ApiError> {
    state
        .store
        .find_user_by_id(id)
        .await?
        .ok_or(ApiError::UserNotFound)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub roles: Vec<Role>,
    pub subscribed_plan: Option<String>,
    pub plan_title: Option<String>,
    pub plan_start_date: Option<DateTime<Utc>>,
    pub plan_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_access: DateTime<Utc>,
    pub profile: Profile,
    pub completed_videos: u64,
    pub total_videos: u64,
    pub completion_rate: u32,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub code: String,
    pub title: String,
    #[serde(rename = "priceJPY")]
    pub price_jpy: i64,
    pub duration_days: i64,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        CourseSummary {
            code: course.code.clone(),
            title: course.title.clone(),
            price_jpy: course.price_jpy,
            duration_days: course.duration_days,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberListResponse {
    pub members: Vec<MemberSummary>,
    pub total: usize,
    pub courses: Vec<CourseSummary>,
}

pub async fn list_members(
    State(state): State<AppState>,
    AdminUser(_actor): AdminUser,
) -> Result<Json<MemberListResponse>, ApiError> {
    let users = state.store.list_users().await?;
    let total_videos = state.store.count_published_videos().await?;
    let completed = state.store.completed_video_counts().await?;
    let courses = state.store.list_visible_courses().await?;

    let course_titles: HashMap<&str, &str> = courses
        .iter()
        .map(|c| (c.code.as_str(), c.title.as_str()))
        .collect();

    let members = users
        .iter()
        .map(|user| {
            let completed_videos = completed.get(&user.id).copied().unwrap_or(0);
            let completion_rate = if total_videos > 0 {
                ((completed_videos as f64 / total_videos as f64) * 100.0).round() as u32
            } else {
                0
            };
            let plan_title = user
                .subscribed_plan
                .as_deref()
                .and_then(|code| course_titles.get(code))
                .map(|title| title.to_string());

            MemberSummary {
                id: user.id.to_hex(),
                name: user.name.clone(),
                email: user.email.clone(),
                role: effective_role(&user.roles).to_string(),
                roles: user.roles.clone(),
                subscribed_plan: user.subscribed_plan.clone(),
                plan_title,
                plan_start_date: user.plan_start_date.map(|d| d.to_chrono()),
                plan_end_date: user.plan_end_date.map(|d| d.to_chrono()),
                created_at: user.created_at.to_chrono(),
                last_access: user
                    .last_access
                    .unwrap_or(user.created_at)
                    .to_chrono(),
                profile: user.profile.clone().unwrap_or_default(),
                completed_videos,
                total_videos,
                completion_rate,
                status: user.status.as_str(),
            }
        })
        .collect::<Vec<_>>();

    Ok(Json(MemberListResponse {
        total: members.len(),
        members,
        courses: courses.iter().map(CourseSummary::from).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdateRequest {
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct RoleUpdateResponse {
    pub success: bool,
    pub user: RoleUpdateUser,
}

#[derive(Debug, Serialize)]
pub struct RoleUpdateUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub role: String,
}

pub async fn update_role(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<RoleUpdateRequest>,
) -> Result<Json<RoleUpdateResponse>, ApiError> {
    let requested: EffectiveRole = body
        .role
        .parse()
        .map_err(|_| ApiError::Validation("Invalid role".into()))?;
    let id = parse_member_id(&id)?;
    let target = fetch_target(&state, &id).await?;

    policy::authorize(&actor, &target, AdminAction::ChangeRole(requested))?;

    let new_roles = apply_effective_role(&target.roles, requested);
    state.store.set_roles(&id, &new_roles).await?;
    let updated = fetch_target(&state, &id).await?;

    tracing::info!(actor = %actor.email, target = %updated.email, role = %requested, "role updated");
    Ok(Json(RoleUpdateResponse {
        success: true,
        user: RoleUpdateUser {
            id: updated.id.to_hex(),
            name: updated.name,
            email: updated.email,
            role: effective_role(&updated.roles).to_string(),
            roles: updated.roles,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub user: StatusUpdateUser,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: &'static str,
}

pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    let status = AccountStatus::parse(&body.status)
        .ok_or_else(|| ApiError::Validation("Invalid status".into()))?;
    let id = parse_member_id(&id)?;
    let target = fetch_target(&state, &id).await?;

    policy::authorize(&actor, &target, AdminAction::ChangeStatus)?;

    state.store.set_status(&id, status).await?;
    let updated = fetch_target(&state, &id).await?;

    tracing::info!(actor = %actor.email, target = %updated.email, status = status.as_str(), "status updated");
    Ok(Json(StatusUpdateResponse {
        success: true,
        user: StatusUpdateUser {
            id: updated.id.to_hex(),
            name: updated.name,
            email: updated.email,
            status: updated.status.as_str(),
        },
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdateRequest {
    #[serde(default)]
    pub plan_code: String,
}

#[derive(Debug, Serialize)]
pub struct PlanUpdateResponse {
    pub success: bool,
    pub user: PlanUpdateUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdateUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subscribed_plan: Option<String>,
    pub plan_start_date: Option<DateTime<Utc>>,
    pub plan_end_date: Option<DateTime<Utc>>,
}

pub async fn update_plan(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<PlanUpdateRequest>,
) -> Result<Json<PlanUpdateResponse>, ApiError> {
    let id = parse_member_id(&id)?;
    fetch_target(&state, &id).await?;

    let assignment = if body.plan_code.is_empty() || body.plan_code == "none" {
        None
    } else {
        let course = state
            .store
            .find_course_by_code(&body.plan_code)
            .await?
            .ok_or_else(|| ApiError::Validation("Invalid plan code".into()))?;

        let start = Utc::now();
        // Zero duration means an unbounded plan: no end date.
        let end = (course.duration_days > 0)
            .then(|| start + Duration::days(course.duration_days));
        Some(PlanAssignment {
            code: course.code,
            start: mongodb::bson::DateTime::from_chrono(start),
            end: end.map(mongodb::bson::DateTime::from_chrono),
        })
    };

    state.store.set_plan(&id, assignment).await?;
    let updated = fetch_target(&state, &id).await?;

    tracing::info!(actor = %actor.email, target = %updated.email, plan = ?updated.subscribed_plan, "plan updated");
    Ok(Json(PlanUpdateResponse {
        success: true,
        user: PlanUpdateUser {
            id: updated.id.to_hex(),
            name: updated.name,
            email: updated.email,
            subscribed_plan: updated.subscribed_plan,
            plan_start_date: updated.plan_start_date.map(|d| d.to_chrono()),
            plan_end_date: updated.plan_end_date.map(|d| d.to_chrono()),
        },
    }))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

pub async fn delete_member(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_member_id(&id)?;
    let target = fetch_target(&state, &id).await?;

    policy::authorize(&actor, &target, AdminAction::Delete)?;

    state.store.delete_user(&id).await?;
    tracing::info!(actor = %actor.email, target = %target.email, "member deleted");
    Ok(Json(DeleteResponse {
        success: true,
        message: "User deleted successfully".into(),
    }))
}
