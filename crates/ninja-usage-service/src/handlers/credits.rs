//! Credit balance handler.
//!
//! Feeds the dashboard's credits badge and lets the analysis workflow ask
//! whether the caller may run one more billable action.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use ninja_usage_core::{evaluate, summarize, BillingPeriod, Credits, Tier};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Credit balance response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsResponse {
    /// The caller's tier.
    pub tier: Tier,
    /// Credits left this period.
    pub credits_remaining: Credits,
    /// Whether the balance is low.
    pub is_low_balance: bool,
    /// Whether one more billable action is allowed.
    pub can_perform_action: bool,
    /// Start of the current billing period.
    pub period_start: DateTime<Utc>,
    /// End of the current billing period (exclusive).
    pub period_end: DateTime<Utc>,
}

/// Get the current user's credit balance.
pub async fn get_credits(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<CreditsResponse>, ApiError> {
    let period = BillingPeriod::monthly(Utc::now())?;

    let events = state
        .ledger
        .fetch_events(&auth.user_id, Some(period.start()))
        .await
        .map_err(|e| {
            tracing::error!(
                user_id = %auth.user_id,
                error = %e,
                "Failed to fetch usage events"
            );
            ApiError::from(e)
        })?;

    let used = summarize(&events, &period).events_this_period;
    let status = evaluate(auth.tier, used, &state.config.tier_limits);

    Ok(Json(CreditsResponse {
        tier: auth.tier,
        credits_remaining: status.credits_remaining,
        is_low_balance: status.is_low_balance,
        can_perform_action: status.can_perform_action,
        period_start: period.start(),
        period_end: period.end(),
    }))
}
