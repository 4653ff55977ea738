//! Payment and teacher-earnings handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use tutorpay_core::{SessionId, TeacherId};
use tutorpay_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Payment request.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Amount to pay in cents.
    pub amount_cents: i64,
    /// The teacher being paid.
    pub teacher_id: TeacherId,
    /// The session being paid for, if any.
    pub session_id: Option<SessionId>,
    /// Optional note for the transaction record.
    pub description: Option<String>,
}

/// Payment response.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// The completed payment transaction ID.
    pub transaction_id: String,
    /// Final transaction status.
    pub status: String,
    /// Payer balance after the debit.
    pub balance_cents: i64,
    /// Amount credited to the teacher.
    pub teacher_share_cents: i64,
}

/// Pay a teacher for a tutoring session.
pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    if body.amount_cents <= 0 {
        return Err(ApiError::BadRequest("Payment amount must be positive".into()));
    }

    let processor = state
        .payments
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Settlement gateway not configured".into()))?;

    tracing::info!(
        user_id = %auth.user_id,
        teacher_id = %body.teacher_id,
        amount_cents = %body.amount_cents,
        "Initiating payment"
    );

    let outcome = processor
        .process_payment(
            &auth.user_id,
            body.amount_cents,
            body.session_id,
            &body.teacher_id,
            body.description,
        )
        .await?;

    Ok(Json(PaymentResponse {
        transaction_id: outcome.transaction.id.to_string(),
        status: format!("{:?}", outcome.transaction.status).to_lowercase(),
        balance_cents: outcome.wallet.balance_cents,
        teacher_share_cents: outcome.teacher_share_cents,
    }))
}

/// Teacher earnings response.
#[derive(Debug, Serialize)]
pub struct EarningsResponse {
    /// The teacher the earnings belong to.
    pub teacher_id: String,
    /// Total earned in cents.
    pub total_cents: i64,
    /// Total formatted as dollars.
    pub total_formatted: String,
    /// When earnings were last credited, if ever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Get a teacher's accumulated earnings.
///
/// A teacher with no settled payments yet reads as zero rather than as
/// an error.
pub async fn get_teacher_earnings(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(teacher_id): Path<String>,
) -> Result<Json<EarningsResponse>, ApiError> {
    let teacher_id: TeacherId = teacher_id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid teacher ID".into()))?;

    let earnings = state.store.get_earnings(&teacher_id)?;

    let (total_cents, updated_at) = earnings
        .map_or((0, None), |e| (e.total_cents, Some(e.updated_at.to_rfc3339())));

    Ok(Json(EarningsResponse {
        teacher_id: teacher_id.to_string(),
        total_cents,
        total_formatted: format!("${:.2}", total_cents as f64 / 100.0),
        updated_at,
    }))
}
