//! Request and response types mirroring the tutorpay HTTP API.

use serde::{Deserialize, Serialize};

/// Wallet balance.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    /// Balance in cents.
    pub balance_cents: i64,
    /// Balance formatted as dollars.
    pub balance_formatted: String,
    /// Wallet currency.
    pub currency: String,
    /// When the wallet was last mutated (RFC 3339).
    pub updated_at: String,
}

/// One transaction on the audit trail.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// Transaction kind: deposit, withdrawal, payment, or refund.
    pub kind: String,
    /// Amount in cents (always positive; `kind` carries direction).
    pub amount_cents: i64,
    /// Status: pending, completed, or failed.
    pub status: String,
    /// Description.
    pub description: String,
    /// Correlated session, if any.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Teacher credited on settlement, for payments.
    #[serde(default)]
    pub teacher_id: Option<String>,
    /// Timestamp (RFC 3339).
    pub created_at: String,
}

/// Result of a deposit or withdrawal.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletMutationResponse {
    /// Balance after the operation.
    pub balance_cents: i64,
    /// The recorded transaction.
    pub transaction: TransactionResponse,
}

/// A page of transaction history.
#[derive(Debug, Clone, Deserialize)]
pub struct ListTransactionsResponse {
    /// Transactions (newest first).
    pub transactions: Vec<TransactionResponse>,
    /// Whether there are more transactions.
    pub has_more: bool,
}

/// Payment request.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    /// Amount to pay in cents.
    pub amount_cents: i64,
    /// The teacher being paid.
    pub teacher_id: String,
    /// The session being paid for, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Optional note for the transaction record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Result of a settled payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentResponse {
    /// The completed payment transaction ID.
    pub transaction_id: String,
    /// Final transaction status.
    pub status: String,
    /// Payer balance after the debit.
    pub balance_cents: i64,
    /// Amount credited to the teacher.
    pub teacher_share_cents: i64,
}

/// A teacher's accumulated earnings.
#[derive(Debug, Clone, Deserialize)]
pub struct EarningsResponse {
    /// The teacher the earnings belong to.
    pub teacher_id: String,
    /// Total earned in cents.
    pub total_cents: i64,
    /// Total formatted as dollars.
    pub total_formatted: String,
    /// When earnings were last credited, if ever (RFC 3339).
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Create subscription request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSubscriptionRequest {
    /// The teacher the subscription is with.
    pub teacher_id: String,
    /// Recurring session slot, if the plan is tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Plan name, e.g. "weekly-60min".
    pub plan: String,
    /// Recurring amount in cents.
    pub amount_cents: i64,
    /// Period length in days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<i64>,
    /// Whether the subscription renews at period end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew: Option<bool>,
}

/// A subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionResponse {
    /// Subscription ID.
    pub id: String,
    /// The teacher the subscription is with.
    pub teacher_id: String,
    /// Plan name.
    pub plan: String,
    /// Recurring amount in cents.
    pub amount_cents: i64,
    /// Status: active, cancelled, or expired.
    pub status: String,
    /// Whether the subscription renews at period end.
    pub auto_renew: bool,
    /// Start of the agreement (RFC 3339).
    pub start_date: String,
    /// End of the current agreement period (RFC 3339).
    pub end_date: String,
}

/// The caller's subscriptions.
#[derive(Debug, Clone, Deserialize)]
pub struct ListSubscriptionsResponse {
    /// Subscriptions, newest first.
    pub subscriptions: Vec<SubscriptionResponse>,
}

/// Error envelope returned by the service.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    /// The error payload.
    pub error: ApiErrorBody,
}

/// Error payload inside the envelope.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Structured details for some codes.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
