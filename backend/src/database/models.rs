//! Rust structs that represent database document mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the `users` and `courses` collections. Field names keep the camelCase
//! form the documents use on the wire.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// Capability tag attached to a user account. Tags are additive: an account
/// keeps its base tag (`student`) when `admin` or `superadmin` are layered on
/// top, and `superadmin` always implies `admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "student")]
    Student,
    #[serde(rename = "instructor")]
    Instructor,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "superadmin")]
    SuperAdmin,
    #[serde(rename = "police_ob")]
    PoliceOb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(AccountStatus::Active),
            "inactive" => Some(AccountStatus::Inactive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

/// Onboarding sub-state for the police-OB track.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObOnboarding {
    #[serde(default)]
    pub training_done: bool,
    #[serde(default)]
    pub pledge_accepted: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub police_ob_verified: bool,
    #[serde(default)]
    pub ob_onboarding: Option<ObOnboarding>,
    #[serde(default)]
    pub subscribed_plan: Option<String>,
    #[serde(default)]
    pub plan_start_date: Option<DateTime>,
    #[serde(default)]
    pub plan_end_date: Option<DateTime>,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default = "DateTime::now")]
    pub created_at: DateTime,
    #[serde(default)]
    pub last_access: Option<DateTime>,
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl User {
    /// Fresh account carrying the base role tag. The email is case-folded
    /// here so every lookup can rely on lowercase storage.
    pub fn new(name: &str, email: &str, password_hash: String) -> Self {
        User {
            id: ObjectId::new(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            roles: vec![Role::Student],
            police_ob_verified: false,
            ob_onboarding: None,
            subscribed_plan: None,
            plan_start_date: None,
            plan_end_date: None,
            status: AccountStatus::Active,
            created_at: DateTime::now(),
            last_access: None,
            profile: None,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_superadmin(&self) -> bool {
        self.has_role(Role::SuperAdmin)
    }

    /// Admin-level access is carried by either the `admin` or `superadmin` tag.
    pub fn has_admin_access(&self) -> bool {
        self.has_role(Role::Admin) || self.has_role(Role::SuperAdmin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseMode {
    Online,
    Hybrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub code: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "priceJPY")]
    pub price_jpy: i64,
    pub duration_days: i64,
    pub mode: CourseMode,
    #[serde(default)]
    pub syllabus: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

/// Plan fields written to a user document as one unit. `end` is `None` for
/// unbounded courses (zero duration).
#[derive(Debug, Clone)]
pub struct PlanAssignment {
    pub code: String,
    pub start: DateTime,
    pub end: Option<DateTime>,
}
