//! Common test utilities for tutorpay integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tempfile::TempDir;

use tutorpay_core::UserId;
use tutorpay_service::{create_router, AppState, JwtClaims, ServiceConfig};
use tutorpay_store::RocksStore;

/// HS256 secret shared between the harness and the service under test.
const TEST_AUTH_SECRET: &str = "test-secret";

/// JWT audience expected by the service under test.
const TEST_AUDIENCE: &str = "tutorpay";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and no
    /// settlement gateway (payments unavailable).
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a harness whose payment processor talks to the given
    /// gateway URL (normally a wiremock server).
    pub fn with_gateway(gateway_url: &str) -> Self {
        Self::build(Some(gateway_url.to_string()))
    }

    fn build(gateway_url: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let gateway_api_key = gateway_url.as_ref().map(|_| "sk_test".to_string());
        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            auth_secret: TEST_AUTH_SECRET.into(),
            auth_audience: TEST_AUDIENCE.into(),
            gateway_url,
            gateway_api_key,
            settlement_timeout_seconds: 2,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");
        let test_user_id = UserId::generate();

        Self {
            server,
            _temp_dir: temp_dir,
            test_user_id,
        }
    }

    /// Mint a valid bearer token for an arbitrary user.
    pub fn auth_header_for(user_id: UserId) -> String {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            aud: TEST_AUDIENCE.into(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_AUTH_SECRET.as_bytes()),
        )
        .expect("Failed to sign test token");
        format!("Bearer {token}")
    }

    /// Get the authorization header for the harness's test user.
    pub fn user_auth_header(&self) -> String {
        Self::auth_header_for(self.test_user_id)
    }

    /// Get a different user's auth header (for testing isolation).
    pub fn other_user_auth_header() -> String {
        Self::auth_header_for(UserId::generate())
    }

    /// Fund the test user's wallet through the API.
    pub async fn deposit(&self, amount_cents: i64) {
        self.server
            .post("/v1/wallet/deposit")
            .add_header("authorization", self.user_auth_header())
            .json(&serde_json::json!({ "amount_cents": amount_cents }))
            .await
            .assert_status_ok();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
