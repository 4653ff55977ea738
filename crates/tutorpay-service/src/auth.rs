//! Authentication extractor.
//!
//! The identity provider issues HS256-signed JWTs; this service
//! validates signature, expiry, and audience, and consumes the token
//! purely as a source of the caller's user ID (`sub` claim).

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use tutorpay_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// An authenticated user extracted from a bearer JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
    /// The raw subject claim from the JWT.
    pub subject: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // Extract the Authorization header
            let auth_header = parts
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            // Extract the Bearer token
            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or(ApiError::Unauthorized)?;

            let mut validation = Validation::new(Algorithm::HS256);
            validation.set_audience(&[&state.config.auth_audience]);

            let key = DecodingKey::from_secret(state.config.auth_secret.as_bytes());
            let data =
                decode::<JwtClaims>(token, &key, &validation).map_err(|err| {
                    tracing::debug!(error = %err, "JWT validation failed");
                    ApiError::Unauthorized
                })?;

            let user_id = data
                .claims
                .sub
                .parse::<UserId>()
                .map_err(|_| ApiError::Unauthorized)?;

            Ok(AuthUser {
                user_id,
                subject: data.claims.sub,
            })
        })
    }
}

/// JWT claims structure for identity-provider tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Audience.
    pub aud: String,
    /// Expiration time.
    pub exp: i64,
    /// Issued at.
    pub iat: i64,
}
