//! Usage event types.
//!
//! One `UsageEvent` is recorded per billable action. Events are immutable once
//! written to the ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BillingError;
use crate::{EventId, UserId};

/// Highest ATS score an analysis can produce.
pub const MAX_SCORE: u32 = 100;

/// A billable action recorded in the usage ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvent {
    /// Unique event ID (also the idempotency key).
    pub id: EventId,

    /// The user who performed the action.
    pub user_id: UserId,

    /// What kind of action it was.
    pub kind: UsageKind,

    /// When the action happened.
    pub occurred_at: DateTime<Utc>,

    /// Score produced by the action, if it produces one.
    pub score_value: Option<u32>,
}

impl UsageEvent {
    /// Create a new event of the given kind, stamped with the current time.
    #[must_use]
    pub fn new(user_id: UserId, kind: UsageKind, score_value: Option<u32>) -> Self {
        Self {
            id: EventId::generate(),
            user_id,
            kind,
            occurred_at: Utc::now(),
            score_value,
        }
    }

    /// Create a new analysis event.
    #[must_use]
    pub fn analysis(user_id: UserId, score_value: Option<u32>) -> Self {
        Self::new(user_id, UsageKind::Analysis, score_value)
    }

    /// Override the event time.
    #[must_use]
    pub fn with_occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }

    /// Override the event ID.
    #[must_use]
    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = id;
        self
    }

    /// Check the event before it goes into the ledger.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::InvalidScore` if the score exceeds [`MAX_SCORE`].
    pub fn validate(&self) -> Result<(), BillingError> {
        match self.score_value {
            Some(score) if score > MAX_SCORE => Err(BillingError::InvalidScore {
                score,
                max: MAX_SCORE,
            }),
            _ => Ok(()),
        }
    }
}

/// Kind of billable action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UsageKind {
    /// ATS analysis of an uploaded resume.
    Analysis,

    /// Any other billable action, by name.
    Custom(String),
}

impl UsageKind {
    /// Get the kind name as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Analysis => "analysis",
            Self::Custom(name) => name,
        }
    }
}

impl FromStr for UsageKind {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name {
            "" => Err(BillingError::InvalidKind("empty kind".into())),
            "analysis" => Ok(Self::Analysis),
            other => Ok(Self::Custom(other.to_string())),
        }
    }
}

impl fmt::Display for UsageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for UsageKind {
    type Error = BillingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UsageKind> for String {
    fn from(kind: UsageKind) -> Self {
        kind.as_str().to_string()
    }
}
