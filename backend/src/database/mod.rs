//! Module for database connection setup and the data-access contract.
//!
//! All persistence goes through the [`DataStore`] trait so handlers never
//! touch the driver directly. There is exactly one write path per mutation;
//! every update is a single-document `$set`, relying on the document
//! database's per-document atomicity (no transactions, no retries).

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::{Client, Database};

use crate::errors::ApiError;

pub mod memory;
pub mod models;
pub mod queries;

use models::{AccountStatus, Course, ObOnboarding, PlanAssignment, Role, User};

/// Connect to MongoDB and return a handle to the application database.
pub async fn connect(uri: &str, database_name: &str) -> Result<Database, ApiError> {
    let client = Client::with_uri_str(uri).await?;
    Ok(client.database(database_name))
}

#[async_trait]
pub trait DataStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, ApiError>;
    async fn insert_user(&self, user: &User) -> Result<(), ApiError>;
    /// All users, newest first.
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    async fn delete_user(&self, id: &ObjectId) -> Result<(), ApiError>;

    async fn set_roles(&self, id: &ObjectId, roles: &[Role]) -> Result<(), ApiError>;
    async fn set_status(&self, id: &ObjectId, status: AccountStatus) -> Result<(), ApiError>;
    /// `None` clears the subscription and both plan dates.
    async fn set_plan(&self, id: &ObjectId, plan: Option<PlanAssignment>) -> Result<(), ApiError>;
    async fn set_police_ob_verified(&self, id: &ObjectId) -> Result<(), ApiError>;
    async fn set_ob_onboarding(
        &self,
        id: &ObjectId,
        onboarding: ObOnboarding,
    ) -> Result<(), ApiError>;
    async fn touch_last_access(&self, id: &ObjectId) -> Result<(), ApiError>;

    async fn find_course_by_code(&self, code: &str) -> Result<Option<Course>, ApiError>;
    async fn list_visible_courses(&self) -> Result<Vec<Course>, ApiError>;
    async fn insert_course(&self, course: &Course) -> Result<(), ApiError>;

    /// Total published lesson videos, the denominator for completion stats.
    async fn count_published_videos(&self) -> Result<u64, ApiError>;
    /// Completed-video count per user id.
    async fn completed_video_counts(&self) -> Result<HashMap<ObjectId, u64>, ApiError>;
}
