//! Error types for tutorpay storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record ("wallet", "transaction", "subscription").
        entity: &'static str,
        /// The identifier that was not found.
        id: String,
    },

    /// A debit would take the balance below zero.
    #[error("insufficient funds: balance={balance}, required={required}")]
    InsufficientFunds {
        /// Current balance in cents.
        balance: i64,
        /// Required amount in cents.
        required: i64,
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

    /// The transaction cannot be settled as a payment.
    #[error("transaction not settleable: {transaction_id}: {reason}")]
    NotSettleable {
        /// The offending transaction.
        transaction_id: String,
        /// Why it cannot be settled.
        reason: String,
    },

    /// The subscription is not active.
    #[error("subscription not active: {subscription_id} is {status}")]
    SubscriptionNotActive {
        /// The subscription that was not active.
        subscription_id: String,
        /// Its current status.
        status: String,
    },
}
