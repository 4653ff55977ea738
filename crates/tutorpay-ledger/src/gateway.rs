//! Settlement gateway abstraction and HTTP implementation.
//!
//! Settlement is the single point where money actually moves. The
//! gateway is a genuine external dependency: it can decline, error, or
//! hang, and the payment processor treats every one of those as
//! settlement failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Error type for settlement operations.
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    /// The gateway refused the charge.
    #[error("settlement declined: {reason}")]
    Declined {
        /// Decline reason reported by the gateway.
        reason: String,
    },

    /// HTTP transport failed (connection, TLS, client-side timeout).
    #[error("gateway transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned an unexpected error response.
    #[error("gateway error: HTTP {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the gateway, if any.
        message: String,
    },
}

/// Proof of a settled charge.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementReceipt {
    /// Gateway-side charge identifier.
    pub charge_id: String,
}

/// The external settlement step.
///
/// Implementations must return either success with a receipt or an
/// error; no partial or ambiguous result is modeled. Callers impose
/// their own deadline on top (`tokio::time::timeout`) and treat it as
/// failure, never as assumed success.
#[async_trait]
pub trait SettlementGateway: Send + Sync {
    /// Move `amount_cents` for the charge identified by `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway declines or cannot be reached.
    async fn settle(
        &self,
        amount_cents: i64,
        reference: &str,
    ) -> Result<SettlementReceipt, SettlementError>;
}

/// Charge request body sent to the gateway.
#[derive(Debug, Serialize)]
struct ChargeRequest<'a> {
    amount_cents: i64,
    currency: &'a str,
    reference: &'a str,
}

/// Error envelope returned by the gateway.
#[derive(Debug, Deserialize)]
struct GatewayErrorResponse {
    error: GatewayErrorBody,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    message: String,
}

/// HTTP-backed settlement gateway client.
#[derive(Debug, Clone)]
pub struct HttpSettlementGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpSettlementGateway {
    /// Transport-level timeout for gateway calls.
    const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new gateway client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the settlement gateway
    /// * `api_key` - Secret API key for bearer authentication
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Self::HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl SettlementGateway for HttpSettlementGateway {
    async fn settle(
        &self,
        amount_cents: i64,
        reference: &str,
    ) -> Result<SettlementReceipt, SettlementError> {
        let url = format!("{}/v1/charges", self.base_url);
        let body = ChargeRequest {
            amount_cents,
            currency: "usd",
            reference,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Declines come back as 402 with an error envelope; anything
        // else is an unexpected gateway failure.
        let message = match response.json::<GatewayErrorResponse>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => format!("HTTP {status}"),
        };

        if status == reqwest::StatusCode::PAYMENT_REQUIRED {
            Err(SettlementError::Declined { reason: message })
        } else {
            Err(SettlementError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn gateway_trims_trailing_slash() {
        let gateway = HttpSettlementGateway::new("http://localhost:9090/", "sk_test");
        assert_eq!(gateway.base_url, "http://localhost:9090");
    }

    #[tokio::test]
    async fn settle_success_returns_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/charges"))
            .and(header("authorization", "Bearer sk_test"))
            .and(body_partial_json(serde_json::json!({
                "amount_cents": 1000,
                "currency": "usd"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"charge_id": "ch_123"})),
            )
            .mount(&server)
            .await;

        let gateway = HttpSettlementGateway::new(server.uri(), "sk_test");
        let receipt = gateway.settle(1000, "tx-ref").await.unwrap();
        assert_eq!(receipt.charge_id, "ch_123");
    }

    #[tokio::test]
    async fn settle_decline_maps_to_declined() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/charges"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "error": {"message": "card declined"}
            })))
            .mount(&server)
            .await;

        let gateway = HttpSettlementGateway::new(server.uri(), "sk_test");
        let err = gateway.settle(1000, "tx-ref").await.unwrap_err();
        assert!(matches!(
            err,
            SettlementError::Declined { reason } if reason == "card declined"
        ));
    }

    #[tokio::test]
    async fn settle_server_error_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/charges"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let gateway = HttpSettlementGateway::new(server.uri(), "sk_test");
        let err = gateway.settle(1000, "tx-ref").await.unwrap_err();
        assert!(matches!(err, SettlementError::Api { status: 500, .. }));
    }
}
