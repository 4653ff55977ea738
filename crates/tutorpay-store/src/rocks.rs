//! RocksDB storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait. All read-modify-write operations (balance deltas, earnings
//! credits, status transitions) are serialized behind a single mutation
//! lock; multi-record updates go through a `WriteBatch` so they land
//! atomically or not at all.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use tutorpay_core::{
    teacher_share, DeltaDirection, Subscription, SubscriptionId, SubscriptionStatus,
    TeacherEarnings, TeacherId, Transaction, TransactionId, TransactionKind, TransactionOutcome,
    UserId, Wallet,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    // Serializes every read-modify-write so concurrent deltas against the
    // same record cannot read a stale value and overwrite each other.
    rmw_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a RocksDB database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            rmw_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Take the mutation lock. A poisoned lock only means another thread
    /// panicked mid-operation; the data it guards is in RocksDB, so we
    /// recover the guard instead of propagating the poison.
    fn rmw_guard(&self) -> MutexGuard<'_, ()> {
        self.rmw_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Load a pending transaction for a status transition, rejecting
    /// missing and already-terminal records.
    fn load_pending(&self, transaction_id: &TransactionId) -> Result<Transaction> {
        let transaction =
            self.get_transaction(transaction_id)?
                .ok_or_else(|| StoreError::NotFound {
                    entity: "transaction",
                    id: transaction_id.to_string(),
                })?;

        if transaction.is_terminal() {
            return Err(StoreError::TransactionFinal {
                transaction_id: transaction_id.to_string(),
                status: format!("{:?}", transaction.status).to_lowercase(),
            });
        }

        Ok(transaction)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Wallet Operations
    // =========================================================================

    fn get_wallet(&self, user_id: &UserId) -> Result<Option<Wallet>> {
        let cf = self.cf(cf::WALLETS)?;
        let key = keys::wallet_key(user_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn apply_wallet_delta(
        &self,
        user_id: &UserId,
        amount_cents: i64,
        direction: DeltaDirection,
    ) -> Result<Wallet> {
        if amount_cents <= 0 {
            return Err(StoreError::InvalidAmount {
                amount: amount_cents,
            });
        }

        let _guard = self.rmw_guard();

        let mut wallet = match self.get_wallet(user_id)? {
            Some(wallet) => wallet,
            // First credit creates the wallet; a debit has nothing to
            // debit against.
            None => match direction {
                DeltaDirection::Credit => Wallet::new(*user_id),
                DeltaDirection::Debit => {
                    return Err(StoreError::NotFound {
                        entity: "wallet",
                        id: user_id.to_string(),
                    })
                }
            },
        };

        match direction {
            DeltaDirection::Credit => {
                wallet.balance_cents += amount_cents;
                wallet.lifetime_credited_cents += amount_cents;
            }
            DeltaDirection::Debit => {
                if wallet.balance_cents < amount_cents {
                    return Err(StoreError::InsufficientFunds {
                        balance: wallet.balance_cents,
                        required: amount_cents,
                    });
                }
                wallet.balance_cents -= amount_cents;
                wallet.lifetime_debited_cents += amount_cents;
            }
        }
        wallet.updated_at = chrono::Utc::now();

        let cf = self.cf(cf::WALLETS)?;
        let key = keys::wallet_key(user_id);
        let value = Self::serialize(&wallet)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(wallet)
    }

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    fn put_transaction(&self, transaction: &Transaction) -> Result<()> {
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let tx_key = keys::transaction_key(&transaction.id);
        let user_tx_key = keys::user_transaction_key(&transaction.user_id, &transaction.id);
        let value = Self::serialize(transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_tx, &tx_key, &value);
        batch.put_cf(&cf_by_user, &user_tx_key, []); // Index entry (empty value)

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>> {
        let cf = self.cf(cf::TRANSACTIONS)?;
        let key = keys::transaction_key(transaction_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn finalize_transaction(
        &self,
        transaction_id: &TransactionId,
        outcome: TransactionOutcome,
    ) -> Result<Transaction> {
        let _guard = self.rmw_guard();

        let mut transaction = self.load_pending(transaction_id)?;
        transaction.status = outcome.into();

        let cf = self.cf(cf::TRANSACTIONS)?;
        let key = keys::transaction_key(transaction_id);
        let value = Self::serialize(&transaction)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(transaction)
    }

    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>> {
        let cf_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;
        let prefix = keys::user_transactions_prefix(user_id);

        let iter = self.db.iterator_cf(
            &cf_by_user,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        // ULID keys are time-ordered within the prefix; collect them all
        // and reverse for newest-first.
        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            all_keys.push(key.to_vec());
        }
        all_keys.reverse();

        let mut transactions = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if transactions.len() >= limit {
                break;
            }

            let tx_id = keys::extract_transaction_id_from_user_key(&key);
            if let Some(tx) = self.get_transaction(&tx_id)? {
                transactions.push(tx);
            }
        }

        Ok(transactions)
    }

    // =========================================================================
    // Earnings Operations
    // =========================================================================

    fn get_earnings(&self, teacher_id: &TeacherId) -> Result<Option<TeacherEarnings>> {
        let cf = self.cf(cf::EARNINGS)?;
        let key = keys::earnings_key(teacher_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn credit_earnings(
        &self,
        teacher_id: &TeacherId,
        amount_cents: i64,
    ) -> Result<TeacherEarnings> {
        if amount_cents <= 0 {
            return Err(StoreError::InvalidAmount {
                amount: amount_cents,
            });
        }

        let _guard = self.rmw_guard();

        let mut earnings = self
            .get_earnings(teacher_id)?
            .unwrap_or_else(|| TeacherEarnings::new(*teacher_id));
        earnings.credit(amount_cents, chrono::Utc::now());

        let cf = self.cf(cf::EARNINGS)?;
        let key = keys::earnings_key(teacher_id);
        let value = Self::serialize(&earnings)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(earnings)
    }

    // =========================================================================
    // Subscription Operations
    // =========================================================================

    fn put_subscription(&self, subscription: &Subscription) -> Result<()> {
        let cf_sub = self.cf(cf::SUBSCRIPTIONS)?;
        let cf_by_user = self.cf(cf::SUBSCRIPTIONS_BY_USER)?;

        let sub_key = keys::subscription_key(&subscription.id);
        let user_sub_key = keys::user_subscription_key(&subscription.user_id, &subscription.id);
        let value = Self::serialize(subscription)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_sub, &sub_key, &value);
        batch.put_cf(&cf_by_user, &user_sub_key, []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_subscription(&self, subscription_id: &SubscriptionId) -> Result<Option<Subscription>> {
        let cf = self.cf(cf::SUBSCRIPTIONS)?;
        let key = keys::subscription_key(subscription_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_subscriptions_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>> {
        let cf_by_user = self.cf(cf::SUBSCRIPTIONS_BY_USER)?;
        let prefix = keys::user_subscriptions_prefix(user_id);

        let iter = self.db.iterator_cf(
            &cf_by_user,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        let mut subscriptions = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            let sub_id = keys::extract_subscription_id_from_user_key(&key);
            if let Some(sub) = self.get_subscription(&sub_id)? {
                subscriptions.push(sub);
            }
        }

        // UUID keys carry no time ordering; sort on the record itself.
        subscriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(subscriptions)
    }

    fn cancel_subscription(&self, subscription_id: &SubscriptionId) -> Result<Subscription> {
        let _guard = self.rmw_guard();

        let mut subscription =
            self.get_subscription(subscription_id)?
                .ok_or_else(|| StoreError::NotFound {
                    entity: "subscription",
                    id: subscription_id.to_string(),
                })?;

        let now = chrono::Utc::now();
        let effective = subscription.effective_status(now);
        if effective != SubscriptionStatus::Active {
            return Err(StoreError::SubscriptionNotActive {
                subscription_id: subscription_id.to_string(),
                status: format!("{effective:?}").to_lowercase(),
            });
        }

        subscription.cancel(now);

        let cf = self.cf(cf::SUBSCRIPTIONS)?;
        let key = keys::subscription_key(subscription_id);
        let value = Self::serialize(&subscription)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(subscription)
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn settle_payment(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<(Transaction, TeacherEarnings)> {
        let _guard = self.rmw_guard();

        let mut transaction = self.load_pending(transaction_id)?;

        if transaction.kind != TransactionKind::Payment {
            return Err(StoreError::NotSettleable {
                transaction_id: transaction_id.to_string(),
                reason: format!("kind is {:?}", transaction.kind).to_lowercase(),
            });
        }
        let Some(teacher_id) = transaction.teacher_id else {
            return Err(StoreError::NotSettleable {
                transaction_id: transaction_id.to_string(),
                reason: "no teacher attached".to_string(),
            });
        };

        let share_cents = teacher_share(transaction.amount_cents);
        let mut earnings = self
            .get_earnings(&teacher_id)?
            .unwrap_or_else(|| TeacherEarnings::new(teacher_id));
        earnings.credit(share_cents, chrono::Utc::now());

        transaction.status = TransactionOutcome::Completed.into();

        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_earnings = self.cf(cf::EARNINGS)?;

        let tx_key = keys::transaction_key(transaction_id);
        let earnings_key = keys::earnings_key(&teacher_id);

        let tx_value = Self::serialize(&transaction)?;
        let earnings_value = Self::serialize(&earnings)?;

        // Completion and earnings credit land together or not at all.
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_tx, &tx_key, &tx_value);
        batch.put_cf(&cf_earnings, &earnings_key, &earnings_value);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(
            transaction_id = %transaction_id,
            teacher_id = %teacher_id,
            share_cents = %share_cents,
            "Payment settled"
        );

        Ok((transaction, earnings))
    }
}
