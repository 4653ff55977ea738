//! Wallet balance, deposit, withdrawal, and transaction handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use tutorpay_core::Transaction;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Minimum deposit in cents ($1).
const MIN_DEPOSIT_CENTS: i64 = 100;

/// Maximum deposit in cents ($1000).
const MAX_DEPOSIT_CENTS: i64 = 100_000;

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Balance in cents.
    pub balance_cents: i64,
    /// Balance formatted as dollars.
    pub balance_formatted: String,
    /// Wallet currency.
    pub currency: String,
    /// When the wallet was last mutated.
    pub updated_at: String,
}

/// Get the current wallet balance.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<BalanceResponse>, ApiError> {
    let wallet = state.ledger.balance(&auth.user_id)?;

    Ok(Json(BalanceResponse {
        balance_cents: wallet.balance_cents,
        balance_formatted: format!("${:.2}", wallet.balance_cents as f64 / 100.0),
        currency: wallet.currency,
        updated_at: wallet.updated_at.to_rfc3339(),
    }))
}

/// Deposit request.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// Amount to deposit in cents.
    pub amount_cents: i64,
    /// Optional note for the transaction record.
    pub description: Option<String>,
}

/// Withdrawal request.
#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    /// Amount to withdraw in cents.
    pub amount_cents: i64,
    /// Optional note for the transaction record.
    pub description: Option<String>,
}

/// Response to a completed deposit or withdrawal.
#[derive(Debug, Serialize)]
pub struct WalletMutationResponse {
    /// Balance after the operation.
    pub balance_cents: i64,
    /// The recorded transaction.
    pub transaction: TransactionResponse,
}

/// Deposit into the caller's wallet, creating it on first use.
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<DepositRequest>,
) -> Result<Json<WalletMutationResponse>, ApiError> {
    if body.amount_cents < MIN_DEPOSIT_CENTS {
        return Err(ApiError::BadRequest(format!(
            "Minimum deposit is {MIN_DEPOSIT_CENTS} cents"
        )));
    }
    if body.amount_cents > MAX_DEPOSIT_CENTS {
        return Err(ApiError::BadRequest(format!(
            "Maximum deposit is {MAX_DEPOSIT_CENTS} cents"
        )));
    }

    let (wallet, transaction) =
        state
            .ledger
            .deposit(&auth.user_id, body.amount_cents, body.description)?;

    Ok(Json(WalletMutationResponse {
        balance_cents: wallet.balance_cents,
        transaction: TransactionResponse::from(&transaction),
    }))
}

/// Withdraw from the caller's wallet.
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<WithdrawRequest>,
) -> Result<Json<WalletMutationResponse>, ApiError> {
    if body.amount_cents <= 0 {
        return Err(ApiError::BadRequest(
            "Withdrawal amount must be positive".into(),
        ));
    }

    let (wallet, transaction) =
        state
            .ledger
            .withdraw(&auth.user_id, body.amount_cents, body.description)?;

    Ok(Json(WalletMutationResponse {
        balance_cents: wallet.balance_cents,
        transaction: TransactionResponse::from(&transaction),
    }))
}

/// Transaction list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of transactions to return (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Transaction response.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// Transaction kind.
    pub kind: String,
    /// Amount in cents (always positive; `kind` carries direction).
    pub amount_cents: i64,
    /// Current status.
    pub status: String,
    /// Description.
    pub description: String,
    /// Correlated session, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Teacher credited on settlement, for payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    /// Timestamp.
    pub created_at: String,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            kind: format!("{:?}", tx.kind).to_lowercase(),
            amount_cents: tx.amount_cents,
            status: format!("{:?}", tx.status).to_lowercase(),
            description: tx.description.clone(),
            session_id: tx.session_id.map(|id| id.to_string()),
            teacher_id: tx.teacher_id.map(|id| id.to_string()),
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// List transactions response.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// Transactions (newest first).
    pub transactions: Vec<TransactionResponse>,
    /// Whether there are more transactions.
    pub has_more: bool,
}

/// List the caller's transaction history.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    // Fetch one more than requested to determine has_more
    let limit = query.limit.min(100);
    let transactions = state
        .log
        .list_for_user(&auth.user_id, limit + 1, query.offset)?;

    let has_more = transactions.len() > limit;
    let transactions: Vec<_> = transactions
        .iter()
        .take(limit)
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(ListTransactionsResponse {
        transactions,
        has_more,
    }))
}
