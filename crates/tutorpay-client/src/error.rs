//! Error types for the tutorpay client.

/// Errors returned by the tutorpay client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed (connection, TLS, timeout, decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The wallet cannot cover the requested amount. The caller should
    /// show a specific message and may offer a top-up.
    #[error("insufficient funds: balance={balance}, required={required}")]
    InsufficientFunds {
        /// Current balance in cents.
        balance: i64,
        /// Required amount in cents.
        required: i64,
    },

    /// Settlement declined, errored, or timed out.
    #[error("payment failed: {message}")]
    PaymentFailed {
        /// Reason reported by the service.
        message: String,
    },

    /// The requested record does not exist. Callers typically render
    /// this as an empty or zero state.
    #[error("not found: {message}")]
    NotFound {
        /// Message reported by the service.
        message: String,
    },

    /// Any other error response from the service.
    #[error("API error {status}: {code}: {message}")]
    Api {
        /// Machine-readable error code.
        code: String,
        /// Human-readable message.
        message: String,
        /// HTTP status code.
        status: u16,
    },
}
