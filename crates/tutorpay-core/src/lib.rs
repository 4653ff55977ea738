//! Core types for the tutorpay platform.
//!
//! This crate provides the foundational types shared by the tutorpay
//! wallet, ledger, and payment services:
//!
//! - **Identifiers**: `UserId`, `TeacherId`, `SessionId`, `SubscriptionId`, `TransactionId`
//! - **Wallets**: `Wallet`, `DeltaDirection`
//! - **Transactions**: `Transaction`, `TransactionKind`, `TransactionStatus`
//! - **Subscriptions**: `Subscription`, `SubscriptionStatus`
//! - **Earnings**: `TeacherEarnings` and the payment split helpers
//!
//! # Money representation
//!
//! All amounts are integer minor currency units (cents), stored as `i64`
//! to avoid floating point drift. A wallet balance is never negative;
//! that invariant is enforced by the storage layer, not by these types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod earnings;
pub mod ids;
pub mod subscription;
pub mod transaction;
pub mod wallet;

pub use earnings::{platform_fee, teacher_share, TeacherEarnings, TEACHER_SHARE_PERCENT};
pub use ids::{IdError, SessionId, SubscriptionId, TeacherId, TransactionId, UserId};
pub use subscription::{Subscription, SubscriptionStatus};
pub use transaction::{Transaction, TransactionKind, TransactionOutcome, TransactionStatus};
pub use wallet::{DeltaDirection, Wallet, DEFAULT_CURRENCY};
