//! Client SDK for the tutorpay service.
//!
//! Wraps the HTTP API in typed methods for the mobile and web
//! frontends: wallet balance, deposits, withdrawals, transaction
//! history, payments, teacher earnings, and subscriptions.
//!
//! # Example
//!
//! ```no_run
//! use tutorpay_client::TutorpayClient;
//!
//! # async fn run() -> Result<(), tutorpay_client::ClientError> {
//! let client = TutorpayClient::new("http://localhost:8080", "user-jwt");
//! let balance = client.balance().await?;
//! println!("balance: {}", balance.balance_formatted);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientOptions, TutorpayClient};
pub use error::ClientError;
pub use types::{
    BalanceResponse, CreateSubscriptionRequest, EarningsResponse, ListSubscriptionsResponse,
    ListTransactionsResponse, PaymentRequest, PaymentResponse, SubscriptionResponse,
    TransactionResponse, WalletMutationResponse,
};
