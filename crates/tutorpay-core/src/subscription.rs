//! Subscription types for tutorpay.
//!
//! A subscription is a recurring billing agreement between a student (or
//! parent) and a teacher. In this crate's scope subscriptions are
//! immutable after creation except for cancellation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{SessionId, SubscriptionId, TeacherId, UserId};

/// A recurring billing agreement with a teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique subscription ID.
    pub id: SubscriptionId,

    /// The paying user.
    pub user_id: UserId,

    /// The teacher the subscription is with.
    pub teacher_id: TeacherId,

    /// Recurring session slot, if the plan is tied to one.
    pub session_id: Option<SessionId>,

    /// Plan name, e.g. "weekly-60min".
    pub plan: String,

    /// Recurring amount in cents.
    pub amount_cents: i64,

    /// Current status.
    pub status: SubscriptionStatus,

    /// Whether the subscription renews at period end.
    pub auto_renew: bool,

    /// Start of the agreement.
    pub start_date: DateTime<Utc>,

    /// End of the current agreement period.
    pub end_date: DateTime<Utc>,

    /// When the subscription was created.
    pub created_at: DateTime<Utc>,

    /// When the subscription was cancelled, if it was.
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Create a new active subscription.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: UserId,
        teacher_id: TeacherId,
        session_id: Option<SessionId>,
        plan: String,
        amount_cents: i64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        auto_renew: bool,
    ) -> Self {
        Self {
            id: SubscriptionId::generate(),
            user_id,
            teacher_id,
            session_id,
            plan,
            amount_cents,
            status: SubscriptionStatus::Active,
            auto_renew,
            start_date,
            end_date,
            created_at: Utc::now(),
            cancelled_at: None,
        }
    }

    /// Cancel the subscription: status becomes `Cancelled` and
    /// auto-renew is switched off. The store rejects cancellation of a
    /// non-active subscription before calling this.
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        self.status = SubscriptionStatus::Cancelled;
        self.auto_renew = false;
        self.cancelled_at = Some(now);
    }

    /// The status as of `now`: an active subscription whose period has
    /// ended reads as `Expired` without a stored-state change.
    #[must_use]
    pub fn effective_status(&self, now: DateTime<Utc>) -> SubscriptionStatus {
        if self.status == SubscriptionStatus::Active && now > self.end_date {
            SubscriptionStatus::Expired
        } else {
            self.status
        }
    }
}

/// Status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Subscription is active.
    Active,

    /// Subscription was cancelled by the user.
    Cancelled,

    /// The agreement period ended without renewal.
    Expired,
}
