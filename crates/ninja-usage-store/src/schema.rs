//! Table and column names of the usage ledger.
//!
//! The table itself is owned by the managed database:
//!
//! ```sql
//! create table usage_events (
//!     id          text primary key,
//!     user_id     uuid not null,
//!     kind        text not null,
//!     occurred_at timestamptz not null,
//!     score_value integer
//! );
//! ```

/// Ledger table name.
pub const USAGE_EVENTS: &str = "usage_events";

/// Column names of [`USAGE_EVENTS`].
pub mod col {
    /// Event ID (ULID text).
    pub const ID: &str = "id";

    /// Owning user (UUID).
    pub const USER_ID: &str = "user_id";

    /// Usage kind name.
    pub const KIND: &str = "kind";

    /// Event time.
    pub const OCCURRED_AT: &str = "occurred_at";

    /// Optional score.
    pub const SCORE_VALUE: &str = "score_value";
}
