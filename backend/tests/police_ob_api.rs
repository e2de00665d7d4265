//! Integration tests for the police-OB track: verification gating and the
//! fast-track onboarding markers.

mod common;

use axum::http::{Method, StatusCode};
use common::{seed_user, send, test_app};
use serde_json::json;

use academy_backend::database::models::Role;

#[tokio::test]
async fn verification_is_admin_only() {
    let app = test_app().await;
    let student = seed_user(&app.store, "Student", "student@example.com", &[Role::Student]).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/police-ob/verify",
        Some(&student),
        Some(json!({"userId": student.id.to_hex()})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");
}

#[tokio::test]
async fn verification_sets_the_flag_and_role_tag() {
    let app = test_app().await;
    let admin = seed_user(
        &app.store,
        "Admin",
        "admin@example.com",
        &[Role::Student, Role::Admin],
    )
    .await;
    let member = seed_user(&app.store, "Veteran", "veteran@example.com", &[Role::Student]).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/police-ob/verify",
        Some(&admin),
        Some(json!({
            "userId": member.id.to_hex(),
            "badgeId": "B-1234",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["policeObVerified"], true);
    assert!(body["user"]["roles"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r == "police_ob"));
}

#[tokio::test]
async fn onboarding_requires_verification() {
    let app = test_app().await;
    let member = seed_user(&app.store, "Member", "member@example.com", &[Role::Student]).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/police-ob/quick-onboarding",
        Some(&member),
        Some(json!({"trainingCompleted": true})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Police OB verification required");
}

#[tokio::test]
async fn onboarding_markers_accumulate_to_fast_track() {
    let app = test_app().await;
    let admin = seed_user(
        &app.store,
        "Admin",
        "admin@example.com",
        &[Role::Student, Role::Admin],
    )
    .await;
    let member = seed_user(&app.store, "Veteran", "veteran@example.com", &[Role::Student]).await;

    send(
        &app.router,
        Method::POST,
        "/api/police-ob/verify",
        Some(&admin),
        Some(json!({"userId": member.id.to_hex()})),
    )
    .await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/police-ob/quick-onboarding",
        Some(&member),
        Some(json!({"trainingCompleted": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["obOnboarding"]["trainingDone"], true);
    assert_eq!(body["obOnboarding"]["pledgeAccepted"], false);
    assert_eq!(body["fastTrackEligible"], false);

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/police-ob/quick-onboarding",
        Some(&member),
        Some(json!({"pledgeAccepted": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["obOnboarding"]["trainingDone"], true);
    assert_eq!(body["fastTrackEligible"], true);
}
