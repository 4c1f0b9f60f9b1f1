//! Subscription tiers and per-tier credit allowances.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BillingError;

// ============================================================================
// Constants
// ============================================================================

/// Default free tier allowance per billing period.
pub const DEFAULT_FREE_CREDITS: u32 = 3;

/// Default pro tier allowance per billing period.
pub const DEFAULT_PRO_CREDITS: u32 = 100;

/// JSON spelling of [`Credits::Unlimited`].
const UNLIMITED: &str = "unlimited";

/// Subscription tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Free tier: small fixed allowance per period.
    Free,

    /// Pro tier: larger fixed allowance per period.
    Pro,

    /// Enterprise tier: unlimited.
    Enterprise,
}

impl Tier {
    /// Get the tier name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }

    /// Resolve an optional tier claim.
    ///
    /// A missing claim means the user never subscribed and is on the free tier.
    /// A claim that is present must name a known tier.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::UnknownTier` if the claim is not a known tier.
    pub fn resolve(raw: Option<&str>) -> Result<Self, BillingError> {
        raw.map_or(Ok(Self::Free), str::parse)
    }
}

impl FromStr for Tier {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(BillingError::UnknownTier {
                tier: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A credit amount: either a concrete count or the unlimited sentinel.
///
/// Used both for per-tier caps and for remaining balances. Serializes as a
/// JSON number, or as the string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Credits {
    /// A finite number of credits.
    Limited(u32),

    /// No ceiling.
    Unlimited,
}

impl Credits {
    /// Whether this is the unlimited sentinel.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// The finite count, if any.
    #[must_use]
    pub const fn limit(&self) -> Option<u32> {
        match self {
            Self::Limited(n) => Some(*n),
            Self::Unlimited => None,
        }
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(n) => write!(f, "{n}"),
            Self::Unlimited => f.write_str(UNLIMITED),
        }
    }
}

impl Serialize for Credits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Limited(n) => serializer.serialize_u32(*n),
            Self::Unlimited => serializer.serialize_str(UNLIMITED),
        }
    }
}

impl<'de> Deserialize<'de> for Credits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(u32),
            Word(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Count(n) => Ok(Self::Limited(n)),
            Repr::Word(word) if word == UNLIMITED => Ok(Self::Unlimited),
            Repr::Word(word) => Err(serde::de::Error::custom(format!(
                "expected a credit count or \"{UNLIMITED}\", got \"{word}\""
            ))),
        }
    }
}

/// Per-period credit caps for the limited tiers.
///
/// Enterprise has no entry: it is unlimited by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    /// Free tier cap.
    pub free: u32,

    /// Pro tier cap.
    pub pro: u32,
}

impl TierLimits {
    /// Get the credit cap for a tier.
    #[must_use]
    pub const fn cap(&self, tier: Tier) -> Credits {
        match tier {
            Tier::Free => Credits::Limited(self.free),
            Tier::Pro => Credits::Limited(self.pro),
            Tier::Enterprise => Credits::Unlimited,
        }
    }
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            free: DEFAULT_FREE_CREDITS,
            pro: DEFAULT_PRO_CREDITS,
        }
    }
}
