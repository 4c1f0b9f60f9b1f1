//! Request and response types for the usage client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use ninja_usage_core::{Credits, Tier, UsageSummary};

/// A billable action to record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUsageRequest {
    /// Event ID for idempotency (ULID). The service generates one when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// User who performed the action.
    pub user_id: String,
    /// Kind of action (service default: "analysis").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Score produced by the action (0 to 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_value: Option<u32>,
    /// When the action happened (service default: now).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl RecordUsageRequest {
    /// A resume analysis for `user_id`, optionally scored.
    #[must_use]
    pub fn analysis(user_id: impl Into<String>, score_value: Option<u32>) -> Self {
        Self {
            event_id: None,
            user_id: user_id.into(),
            kind: None,
            score_value,
            occurred_at: None,
        }
    }

    /// Set an explicit event ID so retries are deduplicated.
    #[must_use]
    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }
}

/// Response to a recorded usage event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUsageResponse {
    /// ID of the recorded event.
    pub event_id: String,
    /// Whether the event was recorded.
    pub recorded: bool,
}

/// Credit balance for the current billing period.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsResponse {
    /// The user's tier.
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

/// Error body returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable message.
    pub error: String,
}
