//! PostgreSQL ledger implementation.
//!
//! Talks to the managed `usage_events` table. Each query binds the caller's
//! `user_id`; no query lists another user's rows.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use ninja_usage_core::{UsageEvent, UserId};

use crate::error::{Result, StoreError};
use crate::schema::{col, USAGE_EVENTS};
use crate::LedgerStore;

/// How long to wait for a pooled connection before giving up.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw row shape of the ledger table.
#[derive(sqlx::FromRow)]
struct EventRow {
    id: String,
    user_id: uuid::Uuid,
    kind: String,
    occurred_at: DateTime<Utc>,
    score_value: Option<i32>,
}

impl TryFrom<EventRow> for UsageEvent {
    type Error = StoreError;

    fn try_from(row: EventRow) -> Result<Self> {
        let id = row
            .id
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("event id {}: {e}", row.id)))?;
        let kind = row
            .kind
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("event {}: {e}", row.id)))?;
        let score_value = row
            .score_value
            .map(u32::try_from)
            .transpose()
            .map_err(|e| StoreError::Corrupt(format!("event {} score: {e}", row.id)))?;

        Ok(Self {
            id,
            user_id: UserId::from_uuid(row.user_id),
            kind,
            occurred_at: row.occurred_at,
            score_value,
        })
    }
}

/// PostgreSQL-backed ledger.
#[derive(Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    /// Connect a new pool to the given database URL.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the database cannot be reached.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedger {
    async fn fetch_events(
        &self,
        user_id: &UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<UsageEvent>> {
        let sql = format!(
            "SELECT {id}, {user}, {kind}, {at}, {score} FROM {table} \
             WHERE {user} = $1 AND ($2::timestamptz IS NULL OR {at} >= $2) \
             ORDER BY {at}, {id}",
            id = col::ID,
            user = col::USER_ID,
            kind = col::KIND,
            at = col::OCCURRED_AT,
            score = col::SCORE_VALUE,
            table = USAGE_EVENTS,
        );

        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .bind(user_id.as_uuid())
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(UsageEvent::try_from).collect()
    }

    async fn append_event(&self, event: &UsageEvent) -> Result<()> {
        let sql = format!(
            "INSERT INTO {table} ({id}, {user}, {kind}, {at}, {score}) \
             VALUES ($1, $2, $3, $4, $5)",
            id = col::ID,
            user = col::USER_ID,
            kind = col::KIND,
            at = col::OCCURRED_AT,
            score = col::SCORE_VALUE,
            table = USAGE_EVENTS,
        );

        let score = event
            .score_value
            .map(i32::try_from)
            .transpose()
            .map_err(|e| StoreError::Database(format!("score out of range: {e}")))?;

        sqlx::query(&sql)
            .bind(event.id.to_string())
            .bind(event.user_id.as_uuid())
            .bind(event.kind.as_str())
            .bind(event.occurred_at)
            .bind(score)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return StoreError::DuplicateEvent {
                            event_id: event.id.to_string(),
                        };
                    }
                }
                map_sqlx_error(e)
            })?;

        tracing::debug!(
            event_id = %event.id,
            user_id = %event.user_id,
            kind = %event.kind,
            "Usage event appended"
        );

        Ok(())
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Database(other.to_string()),
    }
}
