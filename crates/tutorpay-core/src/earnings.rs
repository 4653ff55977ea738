//! Teacher earnings for tutorpay.
//!
//! On a settled payment the teacher receives a fixed share of the
//! amount; the remainder is retained by the platform. The retained
//! share is recorded in the payment transaction's metadata, not as a
//! separate ledger row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TeacherId;

/// Share of a settled payment credited to the teacher, in percent.
pub const TEACHER_SHARE_PERCENT: i64 = 80;

/// The teacher's share of a payment amount, in cents.
///
/// Integer division truncates toward zero; the platform fee absorbs the
/// remainder so the two shares always sum to the full amount.
#[must_use]
pub const fn teacher_share(amount_cents: i64) -> i64 {
    amount_cents * TEACHER_SHARE_PERCENT / 100
}

/// The platform's retained share of a payment amount, in cents.
#[must_use]
pub const fn platform_fee(amount_cents: i64) -> i64 {
    amount_cents - teacher_share(amount_cents)
}

/// Accumulated earnings for one teacher.
///
/// Created implicitly on the first credit; only ever increased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherEarnings {
    /// The teacher the earnings belong to.
    pub teacher_id: TeacherId,

    /// Total earned in cents.
    pub total_cents: i64,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When earnings were last credited.
    pub updated_at: DateTime<Utc>,
}

impl TeacherEarnings {
    /// Create a new earnings record with zero total.
    #[must_use]
    pub fn new(teacher_id: TeacherId) -> Self {
        let now = Utc::now();
        Self {
            teacher_id,
            total_cents: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Credit earnings and advance the update timestamp.
    pub fn credit(&mut self, amount_cents: i64, now: DateTime<Utc>) {
        self.total_cents += amount_cents;
        self.updated_at = now;
    }
}
