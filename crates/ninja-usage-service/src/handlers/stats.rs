//! Usage statistics handler.
//!
//! `GET /api/user/stats` resolves the caller, reads only that caller's ledger
//! events, and answers with the aggregated summary. Every failure past
//! authentication becomes a generic 500; a partial summary is never returned.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};

use ninja_usage_core::{evaluate, summarize, BillingPeriod, TierLimits, UsageSummary};
use ninja_usage_store::LedgerStore;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Get the current user's usage summary.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<UsageSummary>, ApiError> {
    let summary = compute_summary(
        state.ledger.as_ref(),
        &auth,
        &state.config.tier_limits,
        Utc::now(),
    )
    .await?;

    Ok(Json(summary))
}

/// Build the summary for `user` from a snapshot of their ledger.
///
/// The score average covers the user's lifetime; credits count only the
/// billing period containing `now`.
pub async fn compute_summary(
    ledger: &dyn LedgerStore,
    user: &AuthUser,
    limits: &TierLimits,
    now: DateTime<Utc>,
) -> Result<UsageSummary, ApiError> {
    let period = BillingPeriod::monthly(now)?;

    let events = ledger
        .fetch_events(&user.user_id, None)
        .await
        .map_err(|e| {
            tracing::error!(
                user_id = %user.user_id,
                error = %e,
                "Failed to fetch usage events"
            );
            ApiError::from(e)
        })?;

    let rollup = summarize(&events, &period);
    let status = evaluate(user.tier, rollup.events_this_period, limits);

    tracing::debug!(
        user_id = %user.user_id,
        tier = %user.tier,
        total_events = rollup.total_events,
        events_this_period = rollup.events_this_period,
        credits_remaining = %status.credits_remaining,
        "Usage summary computed"
    );

    Ok(UsageSummary::new(rollup, status))
}
