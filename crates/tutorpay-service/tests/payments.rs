//! Payment and teacher-earnings integration tests.
//!
//! The settlement gateway is stubbed with wiremock; the service's HTTP
//! gateway client talks to it for real.

mod common;

use common::TestHarness;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tutorpay_core::TeacherId;

async fn gateway_approving() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/charges"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "charge_id": "ch_test_1" })),
        )
        .mount(&server)
        .await;
    server
}

async fn gateway_declining() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/charges"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": { "message": "card declined" }
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn payment_without_gateway_is_bad_gateway() {
    let harness = TestHarness::new();
    harness.deposit(5000).await;

    let response = harness
        .server
        .post("/v1/payments")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "amount_cents": 1000,
            "teacher_id": TeacherId::generate().to_string()
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn successful_payment_debits_payer_and_credits_teacher() {
    let gateway = gateway_approving().await;
    let harness = TestHarness::with_gateway(&gateway.uri());
    harness.deposit(5000).await;

    let teacher_id = TeacherId::generate();
    let response = harness
        .server
        .post("/v1/payments")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "amount_cents": 1000,
            "teacher_id": teacher_id.to_string(),
            "description": "Algebra session"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["balance_cents"], 4000);
    assert_eq!(body["teacher_share_cents"], 800);

    // Earnings are visible through the API.
    let response = harness
        .server
        .get(&format!("/v1/teachers/{teacher_id}/earnings"))
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_cents"], 800);
    assert_eq!(body["total_formatted"], "$8.00");

    // The payment is on the transaction history as completed.
    let response = harness
        .server
        .get("/v1/wallet/transactions")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let body: serde_json::Value = response.json();
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions[0]["kind"], "payment");
    assert_eq!(transactions[0]["status"], "completed");
    assert_eq!(transactions[0]["teacher_id"], teacher_id.to_string());
}

#[tokio::test]
async fn declined_payment_restores_balance_and_records_reversal() {
    let gateway = gateway_declining().await;
    let harness = TestHarness::with_gateway(&gateway.uri());
    harness.deposit(5000).await;

    let teacher_id = TeacherId::generate();
    let response = harness
        .server
        .post("/v1/payments")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "amount_cents": 1000,
            "teacher_id": teacher_id.to_string()
        }))
        .await;

    response.assert_status(axum::http::StatusCode::PAYMENT_REQUIRED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "payment_failed");

    // Balance is back where it started.
    let response = harness
        .server
        .get("/v1/wallet/balance")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance_cents"], 5000);

    // No earnings were paid out.
    let response = harness
        .server
        .get(&format!("/v1/teachers/{teacher_id}/earnings"))
        .add_header("authorization", harness.user_auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_cents"], 0);

    // Audit trail: completed refund on top of the failed payment.
    let response = harness
        .server
        .get("/v1/wallet/transactions")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let body: serde_json::Value = response.json();
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions[0]["kind"], "refund");
    assert_eq!(transactions[0]["status"], "completed");
    assert_eq!(transactions[1]["kind"], "payment");
    assert_eq!(transactions[1]["status"], "failed");
}

#[tokio::test]
async fn insufficient_funds_never_reaches_the_gateway() {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/charges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "charge_id": "ch_x" })))
        .expect(0)
        .mount(&gateway)
        .await;

    let harness = TestHarness::with_gateway(&gateway.uri());
    harness.deposit(100).await;

    let response = harness
        .server
        .post("/v1/payments")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "amount_cents": 1000,
            "teacher_id": TeacherId::generate().to_string()
        }))
        .await;

    response.assert_status(axum::http::StatusCode::PAYMENT_REQUIRED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_funds");
}

#[tokio::test]
async fn payment_with_non_positive_amount_fails() {
    let gateway = gateway_approving().await;
    let harness = TestHarness::with_gateway(&gateway.uri());

    let response = harness
        .server
        .post("/v1/payments")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "amount_cents": 0,
            "teacher_id": TeacherId::generate().to_string()
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn earnings_of_unknown_teacher_read_as_zero() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get(&format!("/v1/teachers/{}/earnings", TeacherId::generate()))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_cents"], 0);
}

#[tokio::test]
async fn earnings_with_invalid_teacher_id_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/teachers/not-a-uuid/earnings")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_bad_request();
}
