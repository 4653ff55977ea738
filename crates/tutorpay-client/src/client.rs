//! Tutorpay HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, BalanceResponse, CreateSubscriptionRequest, EarningsResponse,
    ListSubscriptionsResponse, ListTransactionsResponse, PaymentRequest, PaymentResponse,
    SubscriptionResponse, WalletMutationResponse,
};

/// Tutorpay API client.
///
/// Authenticates every request with the user's bearer JWT, the same
/// token the mobile app receives from the identity provider.
#[derive(Debug, Clone)]
pub struct TutorpayClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TutorpayClient {
    /// Create a new tutorpay client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the tutorpay service (e.g., `"http://tutorpay:8080"`)
    /// * `token` - The user's JWT for bearer authentication
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_options(base_url, token, ClientOptions::default())
    }

    /// Create a new tutorpay client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        token: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Get the current wallet balance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing has been deposited yet; callers
    /// typically render that as a zero balance.
    pub async fn balance(&self) -> Result<BalanceResponse, ClientError> {
        let url = format!("{}/v1/wallet/balance", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Deposit into the wallet, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the
    /// amount.
    pub async fn deposit(
        &self,
        amount_cents: i64,
        description: Option<&str>,
    ) -> Result<WalletMutationResponse, ClientError> {
        let url = format!("{}/v1/wallet/deposit", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "amount_cents": amount_cents,
                "description": description,
            }))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Withdraw from the wallet.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if the wallet cannot cover the
    /// amount; the balance is untouched in that case.
    pub async fn withdraw(
        &self,
        amount_cents: i64,
        description: Option<&str>,
    ) -> Result<WalletMutationResponse, ClientError> {
        let url = format!("{}/v1/wallet/withdraw", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "amount_cents": amount_cents,
                "description": description,
            }))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List transaction history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn transactions(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<ListTransactionsResponse, ClientError> {
        let url = format!(
            "{}/v1/wallet/transactions?limit={limit}&offset={offset}",
            self.base_url
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Pay a teacher for a tutoring session.
    ///
    /// # Errors
    ///
    /// - `InsufficientFunds` if the wallet cannot cover the amount.
    /// - `PaymentFailed` if settlement declines or times out; the
    ///   balance has been restored.
    pub async fn pay(&self, request: PaymentRequest) -> Result<PaymentResponse, ClientError> {
        let url = format!("{}/v1/payments", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a teacher's accumulated earnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn teacher_earnings(&self, teacher_id: &str) -> Result<EarningsResponse, ClientError> {
        let url = format!("{}/v1/teachers/{teacher_id}/earnings", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Create a subscription with a teacher.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or validation rejects it.
    pub async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<SubscriptionResponse, ClientError> {
        let url = format!("{}/v1/subscriptions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the caller's subscriptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn subscriptions(&self) -> Result<ListSubscriptionsResponse, ClientError> {
        let url = format!("{}/v1/subscriptions", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Cancel one of the caller's subscriptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription does not exist, belongs to
    /// another user, or is already cancelled.
    pub async fn cancel_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<SubscriptionResponse, ClientError> {
        let url = format!(
            "{}/v1/subscriptions/{subscription_id}/cancel",
            self.base_url
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        tracing::debug!(status = %status, "tutorpay API returned an error");

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;

                // Map specific error codes to typed errors
                match code {
                    "insufficient_funds" => {
                        let balance = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("balance"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);
                        let required = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("required"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);

                        Err(ClientError::InsufficientFunds { balance, required })
                    }
                    "payment_failed" => Err(ClientError::PaymentFailed { message }),
                    "not_found" => Err(ClientError::NotFound { message }),
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
