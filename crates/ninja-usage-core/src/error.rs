//! Error types for usage accounting.

use crate::ids::IdError;

/// Result type for usage accounting operations.
pub type Result<T> = std::result::Result<T, BillingError>;

/// Errors that can occur in usage accounting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillingError {
    /// A tier value outside the known set.
    #[error("unknown tier: {tier}")]
    UnknownTier {
        /// The raw tier value that was rejected.
        tier: String,
    },

    /// A usage kind that cannot be represented.
    #[error("invalid usage kind: {0}")]
    InvalidKind(String),

    /// A score outside the accepted range.
    #[error("invalid score: {score} (max {max})")]
    InvalidScore {
        /// The rejected score.
        score: u32,
        /// The largest accepted score.
        max: u32,
    },

    /// A billing period whose end is not after its start.
    #[error("invalid billing period: {0}")]
    InvalidPeriod(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
