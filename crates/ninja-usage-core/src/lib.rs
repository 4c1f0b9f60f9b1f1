//! Core types and accounting logic for Resume Ninja usage metering.
//!
//! This crate provides the pure, storage-independent pieces of the platform:
//!
//! - **Identifiers**: `UserId`, `EventId`
//! - **Tiers**: `Tier`, `TierLimits`, `Credits`
//! - **Usage**: `UsageEvent`, `UsageKind`
//! - **Periods**: `BillingPeriod`
//! - **Credit Policy**: [`policy::evaluate`]
//! - **Usage Aggregator**: [`aggregate::summarize`]
//!
//! # Credits
//!
//! **1 credit = 1 billable action** (e.g. one ATS analysis run).
//!
//! - Free and pro tiers get a fixed number of credits per billing period
//! - Enterprise is unlimited, represented by [`Credits::Unlimited`] rather than a large number
//! - Remaining credits are floored at zero

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod aggregate;
pub mod error;
pub mod ids;
pub mod period;
pub mod policy;
pub mod summary;
pub mod tier;
pub mod usage;

pub use aggregate::{summarize, UsageRollup};
pub use error::{BillingError, Result};
pub use ids::{EventId, IdError, UserId};
pub use period::BillingPeriod;
pub use policy::{evaluate, CreditStatus, LOW_BALANCE_THRESHOLD};
pub use summary::UsageSummary;
pub use tier::{Credits, Tier, TierLimits, DEFAULT_FREE_CREDITS, DEFAULT_PRO_CREDITS};
pub use usage::{UsageEvent, UsageKind, MAX_SCORE};
