//! Subscription handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use tutorpay_core::{SessionId, Subscription, SubscriptionId, TeacherId};
use tutorpay_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Longest subscription period accepted, in days.
const MAX_DURATION_DAYS: i64 = 365;

/// Create subscription request.
#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    /// The teacher the subscription is with.
    pub teacher_id: TeacherId,
    /// Recurring session slot, if the plan is tied to one.
    pub session_id: Option<SessionId>,
    /// Plan name, e.g. "weekly-60min".
    pub plan: String,
    /// Recurring amount in cents.
    pub amount_cents: i64,
    /// Period length in days (default: 30).
    #[serde(default = "default_duration_days")]
    pub duration_days: i64,
    /// Whether the subscription renews at period end (default: true).
    #[serde(default = "default_auto_renew")]
    pub auto_renew: bool,
}

fn default_duration_days() -> i64 {
    30
}

fn default_auto_renew() -> bool {
    true
}

/// Subscription response.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    /// Subscription ID.
    pub id: String,
    /// The teacher the subscription is with.
    pub teacher_id: String,
    /// Plan name.
    pub plan: String,
    /// Recurring amount in cents.
    pub amount_cents: i64,
    /// Status as of now (an active subscription past its period end
    /// reads as expired).
    pub status: String,
    /// Whether the subscription renews at period end.
    pub auto_renew: bool,
    /// Start of the agreement.
    pub start_date: String,
    /// End of the current agreement period.
    pub end_date: String,
}

impl From<&Subscription> for SubscriptionResponse {
    fn from(sub: &Subscription) -> Self {
        Self {
            id: sub.id.to_string(),
            teacher_id: sub.teacher_id.to_string(),
            plan: sub.plan.clone(),
            amount_cents: sub.amount_cents,
            status: format!("{:?}", sub.effective_status(Utc::now())).to_lowercase(),
            auto_renew: sub.auto_renew,
            start_date: sub.start_date.to_rfc3339(),
            end_date: sub.end_date.to_rfc3339(),
        }
    }
}

/// Create a subscription with a teacher.
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateSubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    if body.amount_cents <= 0 {
        return Err(ApiError::BadRequest(
            "Subscription amount must be positive".into(),
        ));
    }
    if body.plan.trim().is_empty() {
        return Err(ApiError::BadRequest("Plan name must not be empty".into()));
    }
    if !(1..=MAX_DURATION_DAYS).contains(&body.duration_days) {
        return Err(ApiError::BadRequest(format!(
            "Duration must be between 1 and {MAX_DURATION_DAYS} days"
        )));
    }

    let now = Utc::now();
    let subscription = Subscription::new(
        auth.user_id,
        body.teacher_id,
        body.session_id,
        body.plan,
        body.amount_cents,
        now,
        now + Duration::days(body.duration_days),
        body.auto_renew,
    );
    state.store.put_subscription(&subscription)?;

    tracing::info!(
        user_id = %auth.user_id,
        teacher_id = %subscription.teacher_id,
        subscription_id = %subscription.id,
        plan = %subscription.plan,
        "Subscription created"
    );

    Ok(Json(SubscriptionResponse::from(&subscription)))
}

/// List subscriptions response.
#[derive(Debug, Serialize)]
pub struct ListSubscriptionsResponse {
    /// The caller's subscriptions, newest first.
    pub subscriptions: Vec<SubscriptionResponse>,
}

/// List the caller's subscriptions.
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ListSubscriptionsResponse>, ApiError> {
    let subscriptions = state.store.list_subscriptions_by_user(&auth.user_id)?;

    Ok(Json(ListSubscriptionsResponse {
        subscriptions: subscriptions.iter().map(SubscriptionResponse::from).collect(),
    }))
}

/// Cancel one of the caller's subscriptions.
pub async fn cancel_subscription(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(subscription_id): Path<String>,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    let subscription_id: SubscriptionId = subscription_id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid subscription ID".into()))?;

    // Ownership check before mutation; foreign subscriptions read as
    // absent rather than forbidden.
    let subscription = state
        .store
        .get_subscription(&subscription_id)?
        .filter(|sub| sub.user_id == auth.user_id)
        .ok_or_else(|| {
            ApiError::NotFound(format!("subscription: {subscription_id}"))
        })?;

    let cancelled = state.store.cancel_subscription(&subscription.id)?;

    tracing::info!(
        user_id = %auth.user_id,
        subscription_id = %cancelled.id,
        "Subscription cancelled"
    );

    Ok(Json(SubscriptionResponse::from(&cancelled)))
}
