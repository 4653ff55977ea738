//! Wallet balance, deposit, withdrawal, and transaction integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

// ============================================================================
// Balance
// ============================================================================

#[tokio::test]
async fn get_balance_without_wallet_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/wallet/balance")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn get_balance_without_auth_fails() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/wallet/balance").await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn get_balance_with_garbage_token_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/wallet/balance")
        .add_header("authorization", "Bearer not-a-jwt")
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn deposit_then_get_balance() {
    let harness = TestHarness::new();
    harness.deposit(5000).await;

    let response = harness
        .server
        .get("/v1/wallet/balance")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance_cents"], 5000);
    assert_eq!(body["balance_formatted"], "$50.00");
    assert_eq!(body["currency"], "usd");
}

// ============================================================================
// Deposits
// ============================================================================

#[tokio::test]
async fn deposit_returns_completed_transaction() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/wallet/deposit")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "amount_cents": 2500, "description": "Allowance top-up" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance_cents"], 2500);
    assert_eq!(body["transaction"]["kind"], "deposit");
    assert_eq!(body["transaction"]["status"], "completed");
    assert_eq!(body["transaction"]["description"], "Allowance top-up");
}

#[tokio::test]
async fn deposit_below_minimum_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/wallet/deposit")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "amount_cents": 50 }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn deposit_above_maximum_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/wallet/deposit")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "amount_cents": 200_000 }))
        .await;

    response.assert_status_bad_request();
}

// ============================================================================
// Withdrawals
// ============================================================================

#[tokio::test]
async fn withdraw_success() {
    let harness = TestHarness::new();
    harness.deposit(5000).await;

    let response = harness
        .server
        .post("/v1/wallet/withdraw")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "amount_cents": 2000 }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance_cents"], 3000);
    assert_eq!(body["transaction"]["kind"], "withdrawal");
    assert_eq!(body["transaction"]["status"], "completed");
}

#[tokio::test]
async fn withdraw_overdraft_is_payment_required() {
    let harness = TestHarness::new();
    harness.deposit(100).await;

    let response = harness
        .server
        .post("/v1/wallet/withdraw")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "amount_cents": 150 }))
        .await;

    response.assert_status(axum::http::StatusCode::PAYMENT_REQUIRED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_funds");
    assert_eq!(body["error"]["details"]["balance"], 100);
    assert_eq!(body["error"]["details"]["required"], 150);

    // Balance unchanged.
    let response = harness
        .server
        .get("/v1/wallet/balance")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance_cents"], 100);
}

#[tokio::test]
async fn withdraw_non_positive_amount_fails() {
    let harness = TestHarness::new();
    harness.deposit(5000).await;

    let response = harness
        .server
        .post("/v1/wallet/withdraw")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "amount_cents": 0 }))
        .await;

    response.assert_status_bad_request();
}

// ============================================================================
// Transactions
// ============================================================================

#[tokio::test]
async fn transactions_list_newest_first() {
    let harness = TestHarness::new();
    harness.deposit(5000).await;
    harness.deposit(2500).await;

    let response = harness
        .server
        .get("/v1/wallet/transactions")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["amount_cents"], 2500); // Newest first
    assert_eq!(transactions[1]["amount_cents"], 5000);
    assert_eq!(body["has_more"], false);
}

#[tokio::test]
async fn transactions_paginate_with_has_more() {
    let harness = TestHarness::new();
    harness.deposit(1000).await;
    harness.deposit(2000).await;
    harness.deposit(3000).await;

    let response = harness
        .server
        .get("/v1/wallet/transactions?limit=2&offset=0")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(body["has_more"], true);

    let response = harness
        .server
        .get("/v1/wallet/transactions?limit=2&offset=2")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(body["has_more"], false);
}

#[tokio::test]
async fn transactions_are_isolated_between_users() {
    let harness = TestHarness::new();
    harness.deposit(5000).await;

    let response = harness
        .server
        .get("/v1/wallet/transactions")
        .add_header("authorization", TestHarness::other_user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["transactions"].as_array().unwrap().is_empty());
}
