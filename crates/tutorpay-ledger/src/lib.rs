//! Wallet ledger, transaction log, and payment processing for tutorpay.
//!
//! This crate composes the storage layer into the three domain
//! components the rest of the platform talks to:
//!
//! - [`WalletLedger`] — authoritative balance per user, atomic deltas,
//!   and the composed deposit/withdraw flows.
//! - [`TransactionLog`] — append-only audit trail with one-way status
//!   transitions.
//! - [`PaymentProcessor`] — orchestrates a session payment: pending
//!   transaction, payer debit, external settlement under a bounded
//!   timeout, then either an atomic completion-plus-earnings-credit or
//!   a compensating refund.
//!
//! All three are plain constructed objects holding an injected
//! [`Store`](tutorpay_store::Store) handle; nothing here reaches for
//! global state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod gateway;
pub mod ledger;
pub mod log;
pub mod processor;

pub use error::{LedgerError, Result};
pub use gateway::{HttpSettlementGateway, SettlementError, SettlementGateway, SettlementReceipt};
pub use ledger::WalletLedger;
pub use log::TransactionLog;
pub use processor::{PaymentOutcome, PaymentProcessor};
