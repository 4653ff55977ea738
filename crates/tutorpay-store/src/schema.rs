//! Database schema definitions and column families.

/// Column family names for the RocksDB database.
pub mod cf {
    /// Per-user wallet records, keyed by `user_id`.
    pub const WALLETS: &str = "wallets";

    /// Transactions, keyed by `transaction_id` (ULID).
    pub const TRANSACTIONS: &str = "transactions";

    /// Index: transactions by user, keyed by `user_id || transaction_id`.
    /// Value is empty (index only).
    pub const TRANSACTIONS_BY_USER: &str = "transactions_by_user";

    /// Teacher earnings, keyed by `teacher_id`.
    pub const EARNINGS: &str = "earnings";

    /// Subscriptions, keyed by `subscription_id`.
    pub const SUBSCRIPTIONS: &str = "subscriptions";

    /// Index: subscriptions by user, keyed by `user_id || subscription_id`.
    /// Value is empty (index only).
    pub const SUBSCRIPTIONS_BY_USER: &str = "subscriptions_by_user";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::WALLETS,
        cf::TRANSACTIONS,
        cf::TRANSACTIONS_BY_USER,
        cf::EARNINGS,
        cf::SUBSCRIPTIONS,
        cf::SUBSCRIPTIONS_BY_USER,
    ]
}
