//! The transaction log.

use std::sync::Arc;

use tutorpay_core::{Transaction, TransactionId, TransactionOutcome, UserId};
use tutorpay_store::Store;

use crate::error::{LedgerError, Result};

/// Append-only audit trail of balance-affecting events.
///
/// Records are created pending and move exactly once to completed or
/// failed; attempting a second transition is an error and leaves the
/// stored record untouched.
#[derive(Clone)]
pub struct TransactionLog {
    store: Arc<dyn Store>,
}

impl TransactionLog {
    /// Create a log over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Append a freshly-built pending transaction.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the amount is not positive.
    /// - `Store` if the underlying store fails.
    pub fn record(&self, transaction: Transaction) -> Result<Transaction> {
        if transaction.amount_cents <= 0 {
            return Err(LedgerError::InvalidAmount {
                amount: transaction.amount_cents,
            });
        }
        debug_assert!(!transaction.is_terminal(), "records are appended pending");

        self.store.put_transaction(&transaction)?;
        Ok(transaction)
    }

    /// Mark a pending transaction completed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the transaction does not exist.
    /// - `TransactionFinal` if it is already terminal.
    pub fn mark_completed(&self, transaction_id: &TransactionId) -> Result<Transaction> {
        Ok(self
            .store
            .finalize_transaction(transaction_id, TransactionOutcome::Completed)?)
    }

    /// Mark a pending transaction failed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the transaction does not exist.
    /// - `TransactionFinal` if it is already terminal.
    pub fn mark_failed(&self, transaction_id: &TransactionId) -> Result<Transaction> {
        Ok(self
            .store
            .finalize_transaction(transaction_id, TransactionOutcome::Failed)?)
    }

    /// Get a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transaction does not exist.
    pub fn get(&self, transaction_id: &TransactionId) -> Result<Transaction> {
        self.store
            .get_transaction(transaction_id)?
            .ok_or_else(|| LedgerError::NotFound {
                entity: "transaction",
                id: transaction_id.to_string(),
            })
    }

    /// List a user's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    pub fn list_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .store
            .list_transactions_by_user(user_id, limit, offset)?)
    }
}
