//! Error types for the tutorpay ledger.

use tutorpay_store::StoreError;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur in ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A debit would take the balance below zero. Recoverable; the
    /// caller decides whether to retry or report.
    #[error("insufficient funds: balance={balance}, required={required}")]
    InsufficientFunds {
        /// Current balance in cents.
        balance: i64,
        /// Required amount in cents.
        required: i64,
    },

    /// Settlement declined, errored, or timed out. Recoverable; the
    /// payment transaction has been marked failed and the payer's
    /// wallet restored.
    #[error("payment failed: {reason}")]
    PaymentFailed {
        /// Why the settlement did not go through.
        reason: String,
    },

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record.
        entity: &'static str,
        /// The identifier that was not found.
        id: String,
    },

    /// The amount is zero or negative.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount in cents.
        amount: i64,
    },

    /// The transaction has already reached a terminal status.
    #[error("transaction already finalized: {transaction_id} is {status}")]
    TransactionFinal {
        /// The transaction that was already terminal.
        transaction_id: String,
        /// Its current (terminal) status.
        status: String,
    },

    /// The subscription is not active.
    #[error("subscription not active: {subscription_id} is {status}")]
    SubscriptionNotActive {
        /// The subscription that was not active.
        subscription_id: String,
        /// Its current status.
        status: String,
    },

    /// The underlying store failed. Fatal to the current operation;
    /// never retried here.
    #[error("storage error: {0}")]
    Store(String),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientFunds { balance, required } => {
                Self::InsufficientFunds { balance, required }
            }
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::InvalidAmount { amount } => Self::InvalidAmount { amount },
            StoreError::TransactionFinal {
                transaction_id,
                status,
            } => Self::TransactionFinal {
                transaction_id,
                status,
            },
            StoreError::SubscriptionNotActive {
                subscription_id,
                status,
            } => Self::SubscriptionNotActive {
                subscription_id,
                status,
            },
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Store(msg),
            StoreError::NotSettleable {
                transaction_id,
                reason,
            } => Self::Store(format!("transaction {transaction_id} not settleable: {reason}")),
        }
    }
}
