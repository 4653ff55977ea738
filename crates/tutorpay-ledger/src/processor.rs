//! The payment processor.

use std::sync::Arc;
use std::time::Duration;

use tutorpay_core::{
    platform_fee, teacher_share, DeltaDirection, SessionId, TeacherId, Transaction, UserId, Wallet,
};
use tutorpay_store::Store;

use crate::error::{LedgerError, Result};
use crate::gateway::SettlementGateway;
use crate::ledger::WalletLedger;
use crate::log::TransactionLog;

/// The result of a successfully settled payment.
#[derive(Debug)]
pub struct PaymentOutcome {
    /// The completed payment transaction.
    pub transaction: Transaction,

    /// The payer's wallet after the debit.
    pub wallet: Wallet,

    /// The amount credited to the teacher, in cents.
    pub teacher_share_cents: i64,
}

/// Orchestrates a single payment from a payer to a teacher.
///
/// The flow per attempt:
///
/// 1. Record a pending payment transaction carrying the 80/20 split in
///    its metadata.
/// 2. Debit the payer's wallet; insufficient funds fail the transaction
///    without touching the gateway.
/// 3. Call the settlement gateway under a bounded timeout. A timeout is
///    settlement failure, never assumed success.
/// 4. On success, mark the transaction completed and credit the
///    teacher's share in one atomic store write.
/// 5. On failure, credit the payer back, record the reversal as a
///    completed refund transaction, mark the payment failed, and
///    return [`LedgerError::PaymentFailed`].
///
/// There is no automatic retry; a failed attempt is terminal and retry
/// policy belongs to the caller.
#[derive(Clone)]
pub struct PaymentProcessor {
    ledger: WalletLedger,
    log: TransactionLog,
    store: Arc<dyn Store>,
    gateway: Arc<dyn SettlementGateway>,
    settlement_timeout: Duration,
}

impl PaymentProcessor {
    /// Create a processor over the given store and gateway.
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        gateway: Arc<dyn SettlementGateway>,
        settlement_timeout: Duration,
    ) -> Self {
        Self {
            ledger: WalletLedger::new(Arc::clone(&store)),
            log: TransactionLog::new(Arc::clone(&store)),
            store,
            gateway,
            settlement_timeout,
        }
    }

    /// Process a payment from `user_id` to `teacher_id`.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount_cents` is not positive.
    /// - `NotFound` if the payer has no wallet.
    /// - `InsufficientFunds` if the wallet cannot cover the amount.
    /// - `PaymentFailed` if settlement declines, errors, or times out;
    ///   the payer's balance has been restored.
    /// - `Store` if the persistence layer fails while recording status;
    ///   surfaced rather than swallowed since the log would otherwise
    ///   disagree with reality.
    pub async fn process_payment(
        &self,
        user_id: &UserId,
        amount_cents: i64,
        session_id: Option<SessionId>,
        teacher_id: &TeacherId,
        description: Option<String>,
    ) -> Result<PaymentOutcome> {
        if amount_cents <= 0 {
            return Err(LedgerError::InvalidAmount {
                amount: amount_cents,
            });
        }

        let share_cents = teacher_share(amount_cents);
        let description = description.unwrap_or_else(|| "Tutoring session payment".to_string());
        let transaction = self.log.record(Transaction::payment(
            *user_id,
            amount_cents,
            session_id,
            *teacher_id,
            description,
            serde_json::json!({
                "teacher_share_cents": share_cents,
                "platform_fee_cents": platform_fee(amount_cents),
            }),
        ))?;

        // Debit before settlement so a payment can never settle against
        // funds the payer does not have.
        let wallet = match self
            .ledger
            .apply_delta(user_id, amount_cents, DeltaDirection::Debit)
        {
            Ok(wallet) => wallet,
            Err(err) => {
                tracing::warn!(
                    user_id = %user_id,
                    transaction_id = %transaction.id,
                    error = %err,
                    "Payment rejected before settlement"
                );
                self.log.mark_failed(&transaction.id)?;
                return Err(err);
            }
        };

        let reference = transaction.id.to_string();
        let settlement = tokio::time::timeout(
            self.settlement_timeout,
            self.gateway.settle(amount_cents, &reference),
        )
        .await;

        let failure_reason = match settlement {
            Ok(Ok(receipt)) => {
                tracing::debug!(
                    transaction_id = %transaction.id,
                    charge_id = %receipt.charge_id,
                    "Settlement succeeded"
                );
                None
            }
            Ok(Err(err)) => Some(err.to_string()),
            Err(_) => Some(format!(
                "settlement timed out after {}s",
                self.settlement_timeout.as_secs()
            )),
        };

        if let Some(reason) = failure_reason {
            self.compensate(&transaction, amount_cents, &reason)?;
            return Err(LedgerError::PaymentFailed { reason });
        }

        let (transaction, earnings) = self.store.settle_payment(&transaction.id)?;

        tracing::info!(
            user_id = %user_id,
            teacher_id = %teacher_id,
            transaction_id = %transaction.id,
            amount_cents = %amount_cents,
            teacher_share_cents = %share_cents,
            teacher_total_cents = %earnings.total_cents,
            "Payment completed"
        );

        Ok(PaymentOutcome {
            transaction,
            wallet,
            teacher_share_cents: share_cents,
        })
    }

    /// Undo the payer debit after a failed settlement: credit the
    /// amount back, record the reversal as a completed refund, and mark
    /// the payment failed.
    fn compensate(
        &self,
        transaction: &Transaction,
        amount_cents: i64,
        reason: &str,
    ) -> Result<()> {
        tracing::warn!(
            user_id = %transaction.user_id,
            transaction_id = %transaction.id,
            reason = %reason,
            "Settlement failed, reversing payer debit"
        );

        self.ledger
            .apply_delta(&transaction.user_id, amount_cents, DeltaDirection::Credit)?;

        let refund = self.log.record(Transaction::refund(
            transaction.user_id,
            amount_cents,
            format!("Reversal of failed payment {}", transaction.id),
            serde_json::json!({ "reverses": transaction.id.to_string() }),
        ))?;
        self.log.mark_completed(&refund.id)?;
        self.log.mark_failed(&transaction.id)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;
    use tutorpay_core::{TransactionKind, TransactionStatus};
    use tutorpay_store::RocksStore;

    use crate::gateway::{SettlementError, SettlementReceipt};

    struct ApproveGateway;

    #[async_trait]
    impl SettlementGateway for ApproveGateway {
        async fn settle(
            &self,
            _amount_cents: i64,
            _reference: &str,
        ) -> std::result::Result<SettlementReceipt, SettlementError> {
            Ok(SettlementReceipt {
                charge_id: "ch_test".into(),
            })
        }
    }

    struct DeclineGateway;

    #[async_trait]
    impl SettlementGateway for DeclineGateway {
        async fn settle(
            &self,
            _amount_cents: i64,
            _reference: &str,
        ) -> std::result::Result<SettlementReceipt, SettlementError> {
            Err(SettlementError::Declined {
                reason: "card declined".into(),
            })
        }
    }

    struct HangingGateway;

    #[async_trait]
    impl SettlementGateway for HangingGateway {
        async fn settle(
            &self,
            _amount_cents: i64,
            _reference: &str,
        ) -> std::result::Result<SettlementReceipt, SettlementError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!("the processor's deadline fires first")
        }
    }

    /// Fails the test if the gateway is reached at all.
    struct UnreachableGateway;

    #[async_trait]
    impl SettlementGateway for UnreachableGateway {
        async fn settle(
            &self,
            _amount_cents: i64,
            _reference: &str,
        ) -> std::result::Result<SettlementReceipt, SettlementError> {
            panic!("settlement must not be invoked")
        }
    }

    fn setup(gateway: Arc<dyn SettlementGateway>) -> (PaymentProcessor, Arc<RocksStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        let processor =
            PaymentProcessor::new(store.clone(), gateway, Duration::from_millis(200));
        (processor, store, dir)
    }

    fn fund(store: &Arc<RocksStore>, user_id: &UserId, amount_cents: i64) {
        store
            .apply_wallet_delta(user_id, amount_cents, DeltaDirection::Credit)
            .unwrap();
    }

    #[tokio::test]
    async fn successful_payment_settles_and_credits_teacher() {
        let (processor, store, _dir) = setup(Arc::new(ApproveGateway));
        let user_id = UserId::generate();
        let teacher_id = TeacherId::generate();
        let session_id = SessionId::generate();
        fund(&store, &user_id, 5000);

        let outcome = processor
            .process_payment(&user_id, 1000, Some(session_id), &teacher_id, None)
            .await
            .unwrap();

        assert_eq!(outcome.transaction.status, TransactionStatus::Completed);
        assert_eq!(outcome.transaction.session_id, Some(session_id));
        assert_eq!(outcome.wallet.balance_cents, 4000);
        assert_eq!(outcome.teacher_share_cents, 800);

        let earnings = store.get_earnings(&teacher_id).unwrap().unwrap();
        assert_eq!(earnings.total_cents, 800);
    }

    #[tokio::test]
    async fn declined_payment_restores_balance_and_records_reversal() {
        let (processor, store, _dir) = setup(Arc::new(DeclineGateway));
        let user_id = UserId::generate();
        let teacher_id = TeacherId::generate();
        fund(&store, &user_id, 5000);

        let err = processor
            .process_payment(&user_id, 1000, None, &teacher_id, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::PaymentFailed { ref reason } if reason.contains("card declined")
        ));

        // Balance is back where it started and no earnings were paid.
        let wallet = store.get_wallet(&user_id).unwrap().unwrap();
        assert_eq!(wallet.balance_cents, 5000);
        assert!(store.get_earnings(&teacher_id).unwrap().is_none());

        // Audit trail: failed payment plus completed refund, newest first.
        let transactions = store.list_transactions_by_user(&user_id, 10, 0).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].kind, TransactionKind::Refund);
        assert_eq!(transactions[0].status, TransactionStatus::Completed);
        assert_eq!(transactions[1].kind, TransactionKind::Payment);
        assert_eq!(transactions[1].status, TransactionStatus::Failed);
    }

    #[tokio::test]
    async fn insufficient_funds_never_reaches_the_gateway() {
        let (processor, store, _dir) = setup(Arc::new(UnreachableGateway));
        let user_id = UserId::generate();
        let teacher_id = TeacherId::generate();
        fund(&store, &user_id, 100);

        let err = processor
            .process_payment(&user_id, 1000, None, &teacher_id, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientFunds {
                balance: 100,
                required: 1000
            }
        ));

        // The attempt is on the trail as failed; balance untouched.
        let transactions = store.list_transactions_by_user(&user_id, 10, 0).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].status, TransactionStatus::Failed);
        assert_eq!(
            store.get_wallet(&user_id).unwrap().unwrap().balance_cents,
            100
        );
    }

    #[tokio::test]
    async fn missing_wallet_fails_before_settlement() {
        let (processor, _store, _dir) = setup(Arc::new(UnreachableGateway));
        let user_id = UserId::generate();
        let teacher_id = TeacherId::generate();

        let err = processor
            .process_payment(&user_id, 1000, None, &teacher_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn settlement_timeout_is_failure() {
        let (processor, store, _dir) = setup(Arc::new(HangingGateway));
        let user_id = UserId::generate();
        let teacher_id = TeacherId::generate();
        fund(&store, &user_id, 5000);

        let err = processor
            .process_payment(&user_id, 1000, None, &teacher_id, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::PaymentFailed { ref reason } if reason.contains("timed out")
        ));

        let wallet = store.get_wallet(&user_id).unwrap().unwrap();
        assert_eq!(wallet.balance_cents, 5000);
        assert!(store.get_earnings(&teacher_id).unwrap().is_none());
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected_up_front() {
        let (processor, store, _dir) = setup(Arc::new(UnreachableGateway));
        let user_id = UserId::generate();
        let teacher_id = TeacherId::generate();

        let err = processor
            .process_payment(&user_id, 0, None, &teacher_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { amount: 0 }));
        assert!(store
            .list_transactions_by_user(&user_id, 10, 0)
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn payment_metadata_carries_the_split() {
        let (processor, store, _dir) = setup(Arc::new(ApproveGateway));
        let user_id = UserId::generate();
        let teacher_id = TeacherId::generate();
        fund(&store, &user_id, 5000);

        let outcome = processor
            .process_payment(&user_id, 999, None, &teacher_id, None)
            .await
            .unwrap();

        assert_eq!(outcome.transaction.metadata["teacher_share_cents"], 799);
        assert_eq!(outcome.transaction.metadata["platform_fee_cents"], 200);
    }
}
