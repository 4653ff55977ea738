//! Transaction types for tutorpay.
//!
//! Every balance-affecting event produces a transaction record. Records
//! are created `pending` and move exactly once to `completed` or
//! `failed`; after that they are immutable audit history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{SessionId, TeacherId, TransactionId, UserId};

/// An audit record of one balance-affecting event.
///
/// Transactions use ULIDs for time-ordered IDs, so the per-user index
/// reads back in chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID (ULID for time-ordering).
    pub id: TransactionId,

    /// The user whose wallet is affected.
    pub user_id: UserId,

    /// Correlated tutoring session, if any.
    pub session_id: Option<SessionId>,

    /// Teacher credited on settlement, for payments.
    pub teacher_id: Option<TeacherId>,

    /// What kind of event this records.
    pub kind: TransactionKind,

    /// Amount in cents. Always positive; `kind` carries the direction.
    pub amount_cents: i64,

    /// Current status. `Pending` is the only non-terminal state.
    pub status: TransactionStatus,

    /// Human-readable note.
    pub description: String,

    /// Additional metadata (payment split, reversal references, etc.).
    pub metadata: serde_json::Value,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a pending deposit transaction.
    #[must_use]
    pub fn deposit(user_id: UserId, amount_cents: i64, description: String) -> Self {
        Self::new(user_id, TransactionKind::Deposit, amount_cents, description)
    }

    /// Create a pending withdrawal transaction.
    #[must_use]
    pub fn withdrawal(user_id: UserId, amount_cents: i64, description: String) -> Self {
        Self::new(
            user_id,
            TransactionKind::Withdrawal,
            amount_cents,
            description,
        )
    }

    /// Create a pending payment transaction correlated with a session
    /// and a teacher.
    #[must_use]
    pub fn payment(
        user_id: UserId,
        amount_cents: i64,
        session_id: Option<SessionId>,
        teacher_id: TeacherId,
        description: String,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            session_id,
            teacher_id: Some(teacher_id),
            metadata,
            ..Self::new(user_id, TransactionKind::Payment, amount_cents, description)
        }
    }

    /// Create a pending refund transaction.
    #[must_use]
    pub fn refund(
        user_id: UserId,
        amount_cents: i64,
        description: String,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            metadata,
            ..Self::new(user_id, TransactionKind::Refund, amount_cents, description)
        }
    }

    fn new(
        user_id: UserId,
        kind: TransactionKind,
        amount_cents: i64,
        description: String,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            session_id: None,
            teacher_id: None,
            kind,
            amount_cents,
            status: TransactionStatus::Pending,
            description,
            metadata: serde_json::Value::Null,
            created_at: Utc::now(),
        }
    }

    /// Whether the transaction has reached a terminal status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Kind of balance-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money added to the wallet from an external source.
    Deposit,

    /// Money taken out of the wallet to an external destination.
    Withdrawal,

    /// Payment for a tutoring session, split with the teacher.
    Payment,

    /// Reversal credited back to the wallet.
    Refund,
}

impl TransactionKind {
    /// Whether this kind credits the wallet.
    #[must_use]
    pub const fn is_credit(&self) -> bool {
        matches!(self, Self::Deposit | Self::Refund)
    }

    /// Whether this kind debits the wallet.
    #[must_use]
    pub const fn is_debit(&self) -> bool {
        matches!(self, Self::Withdrawal | Self::Payment)
    }
}

/// Status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Created but not yet settled either way.
    Pending,

    /// Settled successfully. Terminal.
    Completed,

    /// Settlement failed or was rejected. Terminal.
    Failed,
}

impl TransactionStatus {
    /// Whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// The outcome a pending transaction can be finalized with.
///
/// A separate type from [`TransactionStatus`] so the store's finalize
/// operation cannot be handed `Pending` and the `pending -> terminal`
/// edge stays one-way at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    /// Finalize as completed.
    Completed,

    /// Finalize as failed.
    Failed,
}

impl From<TransactionOutcome> for TransactionStatus {
    fn from(outcome: TransactionOutcome) -> Self {
        match outcome {
            TransactionOutcome::Completed => Self::Completed,
            TransactionOutcome::Failed => Self::Failed,
        }
    }
}
