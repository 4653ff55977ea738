//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, payments, subscriptions, wallet};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Wallet (bearer JWT auth)
/// - `GET /v1/wallet/balance` - Get current balance
/// - `POST /v1/wallet/deposit` - Deposit into the wallet
/// - `POST /v1/wallet/withdraw` - Withdraw from the wallet
/// - `GET /v1/wallet/transactions` - List transaction history
///
/// ## Payments (bearer JWT auth)
/// - `POST /v1/payments` - Pay a teacher for a session
/// - `GET /v1/teachers/:teacher_id/earnings` - Teacher earnings
///
/// ## Subscriptions (bearer JWT auth)
/// - `POST /v1/subscriptions` - Create a subscription
/// - `GET /v1/subscriptions` - List subscriptions
/// - `POST /v1/subscriptions/:subscription_id/cancel` - Cancel
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Wallet
        .route("/v1/wallet/balance", get(wallet::get_balance))
        .route("/v1/wallet/deposit", post(wallet::deposit))
        .route("/v1/wallet/withdraw", post(wallet::withdraw))
        .route("/v1/wallet/transactions", get(wallet::list_transactions))
        // Payments
        .route("/v1/payments", post(payments::create_payment))
        .route(
            "/v1/teachers/:teacher_id/earnings",
            get(payments::get_teacher_earnings),
        )
        // Subscriptions
        .route("/v1/subscriptions", post(subscriptions::create_subscription))
        .route("/v1/subscriptions", get(subscriptions::list_subscriptions))
        .route(
            "/v1/subscriptions/:subscription_id/cancel",
            post(subscriptions::cancel_subscription),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
