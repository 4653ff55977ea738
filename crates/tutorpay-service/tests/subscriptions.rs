//! Subscription integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

use tutorpay_core::TeacherId;

fn create_body() -> serde_json::Value {
    json!({
        "teacher_id": TeacherId::generate().to_string(),
        "plan": "weekly-60min",
        "amount_cents": 4000
    })
}

#[tokio::test]
async fn create_and_list_subscriptions() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/subscriptions")
        .add_header("authorization", harness.user_auth_header())
        .json(&create_body())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["plan"], "weekly-60min");
    assert_eq!(body["status"], "active");
    assert_eq!(body["auto_renew"], true);

    let response = harness
        .server
        .get("/v1/subscriptions")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["subscriptions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_subscription_requires_auth() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/subscriptions")
        .json(&create_body())
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn create_subscription_with_invalid_amount_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/subscriptions")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "teacher_id": TeacherId::generate().to_string(),
            "plan": "weekly-60min",
            "amount_cents": -100
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn create_subscription_with_excessive_duration_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/subscriptions")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "teacher_id": TeacherId::generate().to_string(),
            "plan": "weekly-60min",
            "amount_cents": 4000,
            "duration_days": 9999
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn cancel_subscription_disables_auto_renew() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/subscriptions")
        .add_header("authorization", harness.user_auth_header())
        .json(&create_body())
        .await;
    let body: serde_json::Value = response.json();
    let subscription_id = body["id"].as_str().unwrap().to_string();

    let response = harness
        .server
        .post(&format!("/v1/subscriptions/{subscription_id}/cancel"))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["auto_renew"], false);
}

#[tokio::test]
async fn cancel_twice_is_conflict() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/subscriptions")
        .add_header("authorization", harness.user_auth_header())
        .json(&create_body())
        .await;
    let body: serde_json::Value = response.json();
    let subscription_id = body["id"].as_str().unwrap().to_string();

    harness
        .server
        .post(&format!("/v1/subscriptions/{subscription_id}/cancel"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_ok();

    let response = harness
        .server
        .post(&format!("/v1/subscriptions/{subscription_id}/cancel"))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn cancel_foreign_subscription_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/subscriptions")
        .add_header("authorization", harness.user_auth_header())
        .json(&create_body())
        .await;
    let body: serde_json::Value = response.json();
    let subscription_id = body["id"].as_str().unwrap().to_string();

    let response = harness
        .server
        .post(&format!("/v1/subscriptions/{subscription_id}/cancel"))
        .add_header("authorization", TestHarness::other_user_auth_header())
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn subscriptions_are_isolated_between_users() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/v1/subscriptions")
        .add_header("authorization", harness.user_auth_header())
        .json(&create_body())
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/subscriptions")
        .add_header("authorization", TestHarness::other_user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["subscriptions"].as_array().unwrap().is_empty());
}
