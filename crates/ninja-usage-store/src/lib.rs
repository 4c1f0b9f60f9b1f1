//! Usage ledger storage for Resume Ninja.
//!
//! The ledger is an append-only record of billable usage events. This crate
//! defines the query surface the accounting core needs and two backends:
//!
//! - [`PgLedger`]: the managed PostgreSQL table (feature `postgres-backend`)
//! - [`MemoryLedger`]: an in-process map for local development and tests
//!
//! Every read is scoped to a single user. There is no update or delete path.
//!
//! # Example
//!
//! ```no_run
//! use ninja_usage_core::{UsageEvent, UserId};
//! use ninja_usage_store::{LedgerStore, MemoryLedger};
//!
//! # async fn example() -> ninja_usage_store::Result<()> {
//! let ledger = MemoryLedger::new();
//! let user_id = UserId::generate();
//!
//! ledger.append_event(&UsageEvent::analysis(user_id, Some(82))).await?;
//! let events = ledger.fetch_events(&user_id, None).await?;
//! assert_eq!(events.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;
#[cfg(feature = "postgres-backend")]
pub mod postgres;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryLedger;
#[cfg(feature = "postgres-backend")]
pub use postgres::PgLedger;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ninja_usage_core::{UsageEvent, UserId};

/// The usage ledger query surface.
///
/// Implementations must keep concurrent appends for the same user from
/// corrupting a later read; a read reflecting every append that completed
/// before it started is sufficient.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Fetch a user's events, oldest first.
    ///
    /// When `since` is given, only events at or after it are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn fetch_events(
        &self,
        user_id: &UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<UsageEvent>>;

    /// Append an event to the ledger.
    ///
    /// # Errors
    ///
    /// - `StoreError::DuplicateEvent` if an event with the same ID exists.
    /// - Other variants if the backend cannot be written.
    async fn append_event(&self, event: &UsageEvent) -> Result<()>;
}
