//! Caller identity resolution.
//!
//! Handlers never read a user ID from the request body or query string; they
//! receive the [`Identity`] an [`IdentityProvider`] resolved from the caller's
//! access token.

use async_trait::async_trait;

use ninja_usage_core::{BillingError, Tier, UserId};

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The user ID.
    pub user_id: UserId,
    /// The user's subscription tier.
    pub tier: Tier,
}

/// Errors from identity resolution.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The token is malformed, expired, or not signed by a trusted key.
    #[error("token rejected: {0}")]
    Rejected(String),

    /// The identity provider could not be reached.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// The token names a tier this service does not know.
    #[error(transparent)]
    Tier(#[from] BillingError),
}

/// Resolves the caller behind a bearer token.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the current user.
    ///
    /// Returns `Ok(None)` when the request carries no token.
    ///
    /// # Errors
    ///
    /// - `IdentityError::Rejected` if the token is invalid.
    /// - `IdentityError::Unavailable` if verification keys cannot be fetched.
    /// - `IdentityError::Tier` if the tier claim is not a known tier.
    async fn current_user(&self, token: Option<&str>) -> Result<Option<Identity>, IdentityError>;
}
