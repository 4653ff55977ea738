//! API handlers.

// Allow precision loss in handlers - amounts displayed are well within f64 precision
#![allow(clippy::cast_precision_loss)]

pub mod health;
pub mod payments;
pub mod subscriptions;
pub mod wallet;
