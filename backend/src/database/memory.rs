//! In-memory [`DataStore`] implementation.
//!
//! Backs the test suite and local development without a running MongoDB.
//! Mutations lock the whole store, which mirrors the per-document atomicity
//! the real database provides for these single-user updates.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use tokio::sync::RwLock;

use crate::errors::ApiError;

use super::models::{AccountStatus, Course, ObOnboarding, PlanAssignment, Role, User};
use super::DataStore;

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    courses: Vec<Course>,
    total_videos: u64,
    completed: HashMap<ObjectId, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the completion counters used by the member list.
    pub async fn set_video_stats(&self, total: u64, completed: HashMap<ObjectId, u64>) {
        let mut inner = self.inner.write().await;
        inner.total_videos = total;
        inner.completed = completed;
    }
}

impl Inner {
    fn user_mut(&mut self, id: &ObjectId) -> Result<&mut User, ApiError> {
        self.users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or(ApiError::UserNotFound)
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let email = email.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), ApiError> {
        self.inner.write().await.users.push(user.clone());
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let inner = self.inner.read().await;
        let mut users = inner.users.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn delete_user(&self, id: &ObjectId) -> Result<(), ApiError> {
        self.inner.write().await.users.retain(|u| &u.id != id);
        Ok(())
    }

    async fn set_roles(&self, id: &ObjectId, roles: &[Role]) -> Result<(), ApiError> {
        let mut inner = self.inner.write().await;
        inner.user_mut(id)?.roles = roles.to_vec();
        Ok(())
    }

    async fn set_status(&self, id: &ObjectId, status: AccountStatus) -> Result<(), ApiError> {
        let mut inner = self.inner.write().await;
        inner.user_mut(id)?.status = status;
        Ok(())
    }

    async fn set_plan(&self, id: &ObjectId, plan: Option<PlanAssignment>) -> Result<(), ApiError> {
        let mut inner = self.inner.write().await;
        let user = inner.user_mut(id)?;
        match plan {
            Some(plan) => {
                user.subscribed_plan = Some(plan.code);
                user.plan_start_date = Some(plan.start);
                user.plan_end_date = plan.end;
            }
            None => {
                user.subscribed_plan = None;
                user.plan_start_date = None;
                user.plan_end_date = None;
            }
        }
        Ok(())
    }

    async fn set_police_ob_verified(&self, id: &ObjectId) -> Result<(), ApiError> {
        let mut inner = self.inner.write().await;
        inner.user_mut(id)?.police_ob_verified = true;
        Ok(())
    }

    async fn set_ob_onboarding(
        &self,
        id: &ObjectId,
        onboarding: ObOnboarding,
    ) -> Result<(), ApiError> {
        let mut inner = self.inner.write().await;
        inner.user_mut(id)?.ob_onboarding = Some(onboarding);
        Ok(())
    }

    async fn touch_last_access(&self, id: &ObjectId) -> Result<(), ApiError> {
        let mut inner = self.inner.write().await;
        inner.user_mut(id)?.last_access = Some(DateTime::now());
        Ok(())
    }

    async fn find_course_by_code(&self, code: &str) -> Result<Option<Course>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.courses.iter().find(|c| c.code == code).cloned())
    }

    async fn list_visible_courses(&self) -> Result<Vec<Course>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.courses.iter().filter(|c| c.visible).cloned().collect())
    }

    async fn insert_course(&self, course: &Course) -> Result<(), ApiError> {
        self.inner.write().await.courses.push(course.clone());
        Ok(())
    }

    async fn count_published_videos(&self) -> Result<u64, ApiError> {
        Ok(self.inner.read().await.total_videos)
    }

    async fn completed_video_counts(&self) -> Result<HashMap<ObjectId, u64>, ApiError> {
        Ok(self.inner.read().await.completed.clone())
    }
}
