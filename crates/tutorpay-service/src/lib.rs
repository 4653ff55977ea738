//! HTTP API service for tutorpay.
//!
//! Exposes the wallet ledger, transaction log, payment processor, and
//! subscriptions over a versioned JSON API. Authentication is a bearer
//! JWT issued by the platform's identity provider; the service consumes
//! it purely as a source of the caller's user ID.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{AuthUser, JwtClaims};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
