//! In-memory ledger.
//!
//! Backed by a single `tokio::sync::RwLock`, so every read observes all
//! appends that finished before it. Nothing survives a restart.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use ninja_usage_core::{EventId, UsageEvent, UserId};

use crate::error::{Result, StoreError};
use crate::LedgerStore;

#[derive(Default)]
struct Inner {
    by_user: HashMap<UserId, Vec<UsageEvent>>,
    ids: HashSet<EventId>,
}

/// In-memory ledger implementation.
#[derive(Default)]
pub struct MemoryLedger {
    inner: RwLock<Inner>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of events across all users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.ids.len()
    }

    /// Whether the ledger holds no events.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn fetch_events(
        &self,
        user_id: &UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<UsageEvent>> {
        let inner = self.inner.read().await;
        let Some(events) = inner.by_user.get(user_id) else {
            return Ok(Vec::new());
        };

        let mut events: Vec<UsageEvent> = events
            .iter()
            .filter(|e| since.map_or(true, |since| e.occurred_at >= since))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at).then(a.id.cmp(&b.id)));

        Ok(events)
    }

    async fn append_event(&self, event: &UsageEvent) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.ids.insert(event.id) {
            return Err(StoreError::DuplicateEvent {
                event_id: event.id.to_string(),
            });
        }

        inner
            .by_user
            .entry(event.user_id)
            .or_default()
            .push(event.clone());

        tracing::debug!(
            event_id = %event.id,
            user_id = %event.user_id,
            kind = %event.kind,
            "Usage event appended"
        );

        Ok(())
    }
}
