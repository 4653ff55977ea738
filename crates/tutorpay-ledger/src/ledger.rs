//! The wallet ledger.

use std::sync::Arc;

use tutorpay_core::{DeltaDirection, Transaction, TransactionOutcome, UserId, Wallet};
use tutorpay_store::Store;

use crate::error::{LedgerError, Result};

/// Maintains the authoritative balance for each user.
///
/// Balance mutation goes through the store's atomic delta primitive, so
/// concurrent mutations of the same wallet serialize and the balance
/// never goes negative. [`WalletLedger::apply_delta`] writes no audit
/// record; the composed [`deposit`](WalletLedger::deposit) and
/// [`withdraw`](WalletLedger::withdraw) flows wrap the delta in a
/// transaction record with the usual pending-then-terminal lifecycle.
#[derive(Clone)]
pub struct WalletLedger {
    store: Arc<dyn Store>,
}

impl WalletLedger {
    /// Create a ledger over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Get the wallet for a user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user has no wallet yet (nothing has
    /// been deposited).
    pub fn balance(&self, user_id: &UserId) -> Result<Wallet> {
        self.store
            .get_wallet(user_id)?
            .ok_or_else(|| LedgerError::NotFound {
                entity: "wallet",
                id: user_id.to_string(),
            })
    }

    /// Apply a raw balance delta atomically and return the updated
    /// wallet. Does not record a transaction.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount_cents` is not positive.
    /// - `NotFound` on a debit against a missing wallet.
    /// - `InsufficientFunds` if a debit would go negative; the balance
    ///   is left untouched.
    pub fn apply_delta(
        &self,
        user_id: &UserId,
        amount_cents: i64,
        direction: DeltaDirection,
    ) -> Result<Wallet> {
        Ok(self
            .store
            .apply_wallet_delta(user_id, amount_cents, direction)?)
    }

    /// Deposit into a user's wallet, creating the wallet on first use.
    ///
    /// Records a deposit transaction around the balance change: the
    /// record is created pending, and finalized completed once the
    /// credit has landed (failed if it has not).
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount_cents` is not positive.
    /// - `Store` if the underlying store fails.
    pub fn deposit(
        &self,
        user_id: &UserId,
        amount_cents: i64,
        description: Option<String>,
    ) -> Result<(Wallet, Transaction)> {
        if amount_cents <= 0 {
            return Err(LedgerError::InvalidAmount {
                amount: amount_cents,
            });
        }

        let description = description.unwrap_or_else(|| "Wallet deposit".to_string());
        let transaction = Transaction::deposit(*user_id, amount_cents, description);
        self.store.put_transaction(&transaction)?;

        match self
            .store
            .apply_wallet_delta(user_id, amount_cents, DeltaDirection::Credit)
        {
            Ok(wallet) => {
                let transaction = self
                    .store
                    .finalize_transaction(&transaction.id, TransactionOutcome::Completed)?;

                tracing::info!(
                    user_id = %user_id,
                    amount_cents = %amount_cents,
                    balance_cents = %wallet.balance_cents,
                    "Deposit completed"
                );
                Ok((wallet, transaction))
            }
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "Deposit failed");
                self.store
                    .finalize_transaction(&transaction.id, TransactionOutcome::Failed)?;
                Err(err.into())
            }
        }
    }

    /// Withdraw from a user's wallet.
    ///
    /// Records a withdrawal transaction around the balance change, in
    /// the same pending-then-terminal shape as
    /// [`deposit`](WalletLedger::deposit).
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount_cents` is not positive.
    /// - `NotFound` if the user has no wallet.
    /// - `InsufficientFunds` if the wallet cannot cover the amount; the
    ///   transaction is recorded as failed and the balance untouched.
    pub fn withdraw(
        &self,
        user_id: &UserId,
        amount_cents: i64,
        description: Option<String>,
    ) -> Result<(Wallet, Transaction)> {
        if amount_cents <= 0 {
            return Err(LedgerError::InvalidAmount {
                amount: amount_cents,
            });
        }

        let description = description.unwrap_or_else(|| "Wallet withdrawal".to_string());
        let transaction = Transaction::withdrawal(*user_id, amount_cents, description);
        self.store.put_transaction(&transaction)?;

        match self
            .store
            .apply_wallet_delta(user_id, amount_cents, DeltaDirection::Debit)
        {
            Ok(wallet) => {
                let transaction = self
                    .store
                    .finalize_transaction(&transaction.id, TransactionOutcome::Completed)?;

                tracing::info!(
                    user_id = %user_id,
                    amount_cents = %amount_cents,
                    balance_cents = %wallet.balance_cents,
                    "Withdrawal completed"
                );
                Ok((wallet, transaction))
            }
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "Withdrawal failed");
                self.store
                    .finalize_transaction(&transaction.id, TransactionOutcome::Failed)?;
                Err(err.into())
            }
        }
    }
}
