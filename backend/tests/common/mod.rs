//! Shared harness for integration tests: an application router backed by the
//! in-memory store, plus request plumbing.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use academy_backend::app;
use academy_backend::auth::service;
use academy_backend::config::Config;
use academy_backend::database::memory::MemoryStore;
use academy_backend::database::models::{Course, CourseMode, Role, User};
use academy_backend::database::DataStore;
use academy_backend::state::AppState;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

/// Low bcrypt cost keeps the login tests fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config() -> Config {
    Config {
        port: 0,
        mongodb_uri: String::new(),
        database_name: "test".into(),
        jwt_secret: SECRET.into(),
        stripe_secret_key: None,
        production: false,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub async fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), test_config());
    TestApp {
        router: app(state),
        store,
    }
}

pub async fn seed_user(store: &MemoryStore, name: &str, email: &str, roles: &[Role]) -> User {
    let mut user = User::new(name, email, "not-a-real-hash".into());
    user.roles = roles.to_vec();
    store.insert_user(&user).await.unwrap();
    user
}

pub async fn seed_course(store: &MemoryStore, code: &str, title: &str, duration_days: i64) {
    let course = Course {
        id: mongodb::bson::oid::ObjectId::new(),
        code: code.into(),
        title: title.into(),
        description: "Test course".into(),
        price_jpy: 50_000,
        duration_days,
        mode: CourseMode::Online,
        syllabus: vec![],
        tags: vec![],
        visible: true,
    };
    store.insert_course(&course).await.unwrap();
}

pub fn session_cookie_for(user: &User) -> String {
    let token = service::issue_token(SECRET, user).unwrap();
    format!("session-token={token}")
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    actor: Option<&User>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header("cookie", session_cookie_for(actor));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
