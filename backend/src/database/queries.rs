//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct MongoDB operations behind the
//! [`DataStore`] trait, abstracting the query logic from higher-level
//! services and API handlers.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, to_bson, Bson, DateTime, Document};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};

use crate::errors::ApiError;

use super::models::{AccountStatus, Course, ObOnboarding, PlanAssignment, Role, User};
use super::DataStore;

pub struct MongoStore {
    users: Collection<User>,
    courses: Collection<Course>,
    videos: Collection<Document>,
    completed_videos: Collection<Document>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        MongoStore {
            users: db.collection("users"),
            courses: db.collection("courses"),
            videos: db.collection("videos"),
            completed_videos: db.collection("completedvideos"),
        }
    }

    async fn update_user(&self, id: &ObjectId, set: Document) -> Result<(), ApiError> {
        self.users
            .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
            .await?;
        Ok(())
    }
}

fn roles_bson(roles: &[Role]) -> Result<Bson, ApiError> {
    to_bson(roles).map_err(|e| ApiError::Internal(e.to_string()))
}

#[async_trait]
impl DataStore for MongoStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = self
            .users
            .find_one(doc! { "email": email.to_lowercase() }, None)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, ApiError> {
        let user = self.users.find_one(doc! { "_id": id }, None).await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<(), ApiError> {
        self.users.insert_one(user, None).await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();
        let users = self.users.find(None, options).await?.try_collect().await?;
        Ok(users)
    }

    async fn delete_user(&self, id: &ObjectId) -> Result<(), ApiError> {
        self.users.delete_one(doc! { "_id": id }, None).await?;
        Ok(())
    }

    async fn set_roles(&self, id: &ObjectId, roles: &[Role]) -> Result<(), ApiError> {
        self.update_user(id, doc! { "roles": roles_bson(roles)? }).await
    }

    async fn set_status(&self, id: &ObjectId, status: AccountStatus) -> Result<(), ApiError> {
        self.update_user(id, doc! { "status": status.as_str() }).await
    }

    async fn set_plan(&self, id: &ObjectId, plan: Option<PlanAssignment>) -> Result<(), ApiError> {
        let set = match plan {
            Some(plan) => doc! {
                "subscribedPlan": plan.code,
                "planStartDate": plan.start,
                "planEndDate": plan.end.map(Bson::DateTime).unwrap_or(Bson::Null),
            },
            None => doc! {
                "subscribedPlan": Bson::Null,
                "planStartDate": Bson::Null,
                "planEndDate": Bson::Null,
            },
        };
        self.update_user(id, set).await
    }

    async fn set_police_ob_verified(&self, id: &ObjectId) -> Result<(), ApiError> {
        self.update_user(id, doc! { "policeObVerified": true }).await
    }

    async fn set_ob_onboarding(
        &self,
        id: &ObjectId,
        onboarding: ObOnboarding,
    ) -> Result<(), ApiError> {
        self.update_user(
            id,
            doc! {
                "obOnboarding": {
                    "trainingDone": onboarding.training_done,
                    "pledgeAccepted": onboarding.pledge_accepted,
                },
            },
        )
        .await
    }

    async fn touch_last_access(&self, id: &ObjectId) -> Result<(), ApiError> {
        self.update_user(id, doc! { "lastAccess": DateTime::now() }).await
    }

    async fn find_course_by_code(&self, code: &str) -> Result<Option<Course>, ApiError> {
        let course = self.courses.find_one(doc! { "code": code }, None).await?;
        Ok(course)
    }

    async fn list_visible_courses(&self) -> Result<Vec<Course>, ApiError> {
        let courses = self
            .courses
            .find(doc! { "visible": true }, None)
            .await?
            .try_collect()
            .await?;
        Ok(courses)
    }

    async fn insert_course(&self, course: &Course) -> Result<(), ApiError> {
        self.courses.insert_one(course, None).await?;
        Ok(())
    }

    async fn count_published_videos(&self) -> Result<u64, ApiError> {
        let count = self
            .videos
            .count_documents(doc! { "isPublished": true }, None)
            .await?;
        Ok(count)
    }

    async fn completed_video_counts(&self) -> Result<HashMap<ObjectId, u64>, ApiError> {
        let pipeline = vec![doc! {
            "$group": { "_id": "$user", "completedCount": { "$sum": 1 } },
        }];
        let mut cursor = self.completed_videos.aggregate(pipeline, None).await?;

        let mut counts = HashMap::new();
        while let Some(group) = cursor.try_next().await? {
            let Ok(user_id) = group.get_object_id("_id") else {
                continue;
            };
            let count = group
                .get("completedCount")
                .and_then(|b| b.as_i64().or_else(|| b.as_i32().map(i64::from)))
                .unwrap_or(0);
            counts.insert(user_id, count as u64);
        }
        Ok(counts)
    }
}
