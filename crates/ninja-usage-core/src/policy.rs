//! Credit Policy.
//!
//! Maps a tier and the number of billable actions consumed in the current
//! period to a remaining balance and an allow/deny decision. Pure.

use serde::{Deserialize, Serialize};

use crate::tier::{Credits, Tier, TierLimits};

/// A balance at or below this many credits is reported as low.
pub const LOW_BALANCE_THRESHOLD: u32 = 1;

/// Outcome of evaluating the credit policy for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditStatus {
    /// Credits left in the current period, floored at zero.
    pub credits_remaining: Credits,

    /// Whether the balance is low enough to warn the user.
    pub is_low_balance: bool,

    /// Whether one more billable action is allowed.
    pub can_perform_action: bool,
}

/// Evaluate the credit policy.
#[must_use]
pub fn evaluate(tier: Tier, period_event_count: u64, limits: &TierLimits) -> CreditStatus {
    match limits.cap(tier) {
        Credits::Unlimited => CreditStatus {
            credits_remaining: Credits::Unlimited,
            is_low_balance: false,
            can_perform_action: true,
        },
        Credits::Limited(cap) => {
            let used = u32::try_from(period_event_count).unwrap_or(u32::MAX);
            let remaining = cap.saturating_sub(used);
            CreditStatus {
                credits_remaining: Credits::Limited(remaining),
                is_low_balance: remaining <= LOW_BALANCE_THRESHOLD,
                can_perform_action: remaining > 0,
            }
        }
    }
}
