//! Key encoding utilities for RocksDB.
//!
//! All primary keys are the raw 16 bytes of the owning identifier.
//! Index keys concatenate the user ID with the record ID, so a prefix
//! scan over `user_id` yields that user's records; transaction IDs are
//! ULIDs, which keeps the transaction index in chronological order.

use tutorpay_core::{SubscriptionId, TeacherId, TransactionId, UserId};

/// Create a wallet key from a user ID.
#[must_use]
pub fn wallet_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a transaction key from a transaction ID.
#[must_use]
pub fn transaction_key(transaction_id: &TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Create a user-transaction index key.
///
/// Format: `user_id (16 bytes) || transaction_id (16 bytes)`
#[must_use]
pub fn user_transaction_key(user_id: &UserId, transaction_id: &TransactionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Create a prefix for iterating all transactions for a user.
#[must_use]
pub fn user_transactions_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the transaction ID from a user-transaction index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_transaction_id_from_user_key(key: &[u8]) -> TransactionId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    TransactionId::from_bytes(bytes).expect("valid ULID bytes")
}

/// Create an earnings key from a teacher ID.
#[must_use]
pub fn earnings_key(teacher_id: &TeacherId) -> Vec<u8> {
    teacher_id.as_bytes().to_vec()
}

/// Create a subscription key from a subscription ID.
#[must_use]
pub fn subscription_key(subscription_id: &SubscriptionId) -> Vec<u8> {
    subscription_id.as_bytes().to_vec()
}

/// Create a user-subscription index key.
///
/// Format: `user_id (16 bytes) || subscription_id (16 bytes)`
#[must_use]
pub fn user_subscription_key(user_id: &UserId, subscription_id: &SubscriptionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(subscription_id.as_bytes());
    key
}

/// Create a prefix for iterating all subscriptions for a user.
#[must_use]
pub fn user_subscriptions_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the subscription ID from a user-subscription index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_subscription_id_from_user_key(key: &[u8]) -> SubscriptionId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    SubscriptionId::from_uuid(uuid::Uuid::from_bytes(bytes))
}
