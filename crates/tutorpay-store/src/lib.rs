//! RocksDB storage layer for tutorpay.
//!
//! This crate persists wallets, transactions, teacher earnings, and
//! subscriptions using RocksDB with column families for indexing.
//!
//! # Architecture
//!
//! Column families:
//!
//! - `wallets`: per-user wallet records, keyed by `user_id`
//! - `transactions`: transactions, keyed by `transaction_id` (ULID)
//! - `transactions_by_user`: index for listing transactions per user
//! - `earnings`: teacher earnings, keyed by `teacher_id`
//! - `subscriptions`: subscriptions, keyed by `subscription_id`
//! - `subscriptions_by_user`: index for listing subscriptions per user
//!
//! # Atomicity
//!
//! Wallet balances, earnings totals, transaction statuses, and
//! subscription cancellations are only ever changed through the
//! read-modify-write operations on [`Store`]. The implementation
//! serializes those operations and persists multi-record updates with a
//! single `WriteBatch`, so concurrent callers cannot lose updates and a
//! rejected operation leaves prior state untouched.
//!
//! # Example
//!
//! ```no_run
//! use tutorpay_store::{RocksStore, Store};
//! use tutorpay_core::{DeltaDirection, UserId};
//!
//! let store = RocksStore::open("/tmp/tutorpay-db").unwrap();
//!
//! // First credit creates the wallet implicitly.
//! let user_id = UserId::generate();
//! let wallet = store
//!     .apply_wallet_delta(&user_id, 5000, DeltaDirection::Credit)
//!     .unwrap();
//! assert_eq!(wallet.balance_cents, 5000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use tutorpay_core::{
    DeltaDirection, Subscription, SubscriptionId, TeacherEarnings, TeacherId, Transaction,
    TransactionId, TransactionOutcome, UserId, Wallet,
};

/// The storage trait defining all database operations.
///
/// Abstracts the storage layer so the ledger and service can be tested
/// against fakes or alternative backends.
pub trait Store: Send + Sync {
    // =========================================================================
    // Wallet Operations
    // =========================================================================

    /// Get a wallet by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_wallet(&self, user_id: &UserId) -> Result<Option<Wallet>>;

    /// Apply a balance delta atomically and return the updated wallet.
    ///
    /// The read-modify-write is serialized against all other wallet
    /// mutations: two concurrent deltas on the same wallet both take
    /// effect, never overwriting each other. A credit creates the wallet
    /// if it does not exist yet (first deposit); a debit on a missing
    /// wallet is `NotFound`. A debit that would take the balance below
    /// zero is rejected in full with `InsufficientFunds`.
    ///
    /// Does not write a transaction record; composing the delta with an
    /// audit record is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// - `StoreError::InvalidAmount` if `amount_cents` is not positive.
    /// - `StoreError::NotFound` on a debit against a missing wallet.
    /// - `StoreError::InsufficientFunds` if a debit would go negative.
    fn apply_wallet_delta(
        &self,
        user_id: &UserId,
        amount_cents: i64,
        direction: DeltaDirection,
    ) -> Result<Wallet>;

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    /// Insert a transaction and maintain the per-user index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Get a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>>;

    /// Finalize a pending transaction with a terminal outcome and return
    /// the updated record.
    ///
    /// The `pending -> {completed, failed}` edge is one-way: finalizing
    /// a transaction that is already terminal is always an error, never
    /// a silent no-op, and the stored record is not touched.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the transaction does not exist.
    /// - `StoreError::TransactionFinal` if it is already terminal.
    fn finalize_transaction(
        &self,
        transaction_id: &TransactionId,
        outcome: TransactionOutcome,
    ) -> Result<Transaction>;

    /// List transactions for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>>;

    // =========================================================================
    // Earnings Operations
    // =========================================================================

    /// Get a teacher's earnings record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_earnings(&self, teacher_id: &TeacherId) -> Result<Option<TeacherEarnings>>;

    /// Credit a teacher's earnings atomically and return the updated
    /// record. Creates the record on first credit.
    ///
    /// # Errors
    ///
    /// - `StoreError::InvalidAmount` if `amount_cents` is not positive.
    fn credit_earnings(&self, teacher_id: &TeacherId, amount_cents: i64)
        -> Result<TeacherEarnings>;

    // =========================================================================
    // Subscription Operations
    // =========================================================================

    /// Insert a subscription and maintain the per-user index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_subscription(&self, subscription: &Subscription) -> Result<()>;

    /// Get a subscription by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_subscription(&self, subscription_id: &SubscriptionId) -> Result<Option<Subscription>>;

    /// List subscriptions for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_subscriptions_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>>;

    /// Cancel an active subscription and return the updated record.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the subscription does not exist.
    /// - `StoreError::SubscriptionNotActive` if it is cancelled or its
    ///   period has already ended.
    fn cancel_subscription(&self, subscription_id: &SubscriptionId) -> Result<Subscription>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Settle a pending payment: mark it completed and credit the
    /// teacher's share of the amount, in one atomic write.
    ///
    /// Either both effects happen or neither does; a settled payment can
    /// never exist without its earnings credit or vice versa.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the transaction does not exist.
    /// - `StoreError::TransactionFinal` if it is already terminal.
    /// - `StoreError::NotSettleable` if it is not a payment with a
    ///   teacher attached.
    fn settle_payment(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<(Transaction, TeacherEarnings)>;
}
