//! Wallet types for tutorpay.
//!
//! A wallet holds the authoritative balance for one user. Balances are
//! mutated exclusively through the storage layer's atomic delta
//! operation; the types here carry no mutation logic of their own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Default wallet currency (ISO 4217, lowercase).
pub const DEFAULT_CURRENCY: &str = "usd";

/// A per-user wallet.
///
/// Created implicitly on the first credit. The balance is kept in minor
/// currency units and is never negative; a debit that would break that
/// invariant is rejected in full by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    /// The owning user.
    pub user_id: UserId,

    /// Current balance in minor currency units (cents).
    pub balance_cents: i64,

    /// ISO currency code, e.g. "usd".
    pub currency: String,

    /// Total amount ever credited (deposits, refunds) in cents.
    pub lifetime_credited_cents: i64,

    /// Total amount ever debited (withdrawals, payments) in cents.
    pub lifetime_debited_cents: i64,

    /// When the wallet was created.
    pub created_at: DateTime<Utc>,

    /// When the wallet was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Create a new wallet with zero balance in the default currency.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            balance_cents: 0,
            currency: DEFAULT_CURRENCY.to_string(),
            lifetime_credited_cents: 0,
            lifetime_debited_cents: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the wallet can cover a debit of `amount_cents`.
    #[must_use]
    pub fn has_sufficient_funds(&self, amount_cents: i64) -> bool {
        self.balance_cents >= amount_cents
    }
}

/// Direction of a balance delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaDirection {
    /// Add to the balance (unbounded).
    Credit,

    /// Subtract from the balance; rejected if it would go negative.
    Debit,
}
