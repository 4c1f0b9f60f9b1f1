//! Combined usage summary returned by the stats endpoint.

use serde::{Deserialize, Serialize};

use crate::aggregate::UsageRollup;
use crate::policy::CreditStatus;
use crate::tier::Credits;

/// Per-user usage summary. Derived on every request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    /// Lifetime event count.
    pub total_events: u64,

    /// Events in the current billing period.
    pub events_this_period: u64,

    /// Credits left in the current billing period.
    pub credits_remaining: Credits,

    /// Whether the balance is low.
    pub is_low_balance: bool,

    /// Lifetime average score; `null` when no event carries a score.
    pub average_score: Option<u32>,
}

impl UsageSummary {
    /// Merge an aggregator rollup with a policy outcome.
    #[must_use]
    pub const fn new(rollup: UsageRollup, status: CreditStatus) -> Self {
        Self {
            total_events: rollup.total_events,
            events_this_period: rollup.events_this_period,
            credits_remaining: status.credits_remaining,
            is_low_balance: status.is_low_balance,
            average_score: rollup.average_score,
        }
    }
}
