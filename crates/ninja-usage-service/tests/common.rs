//! Common test utilities for usage service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};

use ninja_usage_core::{BillingPeriod, Tier, TierLimits, UsageEvent, UserId};
use ninja_usage_service::{
    create_router, AppState, Identity, IdentityError, IdentityProvider, ServiceConfig,
};
use ninja_usage_store::{LedgerStore, MemoryLedger, StoreError};

/// Token the test identity provider treats as an identity-provider outage.
pub const OUTAGE_TOKEN: &str = "provider-down";

/// Token the test identity provider takes several seconds to resolve.
pub const SLOW_TOKEN: &str = "provider-slow";

/// Internal detail carried by injected store failures; must never reach a client.
pub const LEAKY_DETAIL: &str = "connection refused: db.internal:5432";

/// Identity provider that resolves tokens of the form `<uuid>:<tier>`.
pub struct TestIdentity;

#[async_trait]
impl IdentityProvider for TestIdentity {
    async fn current_user(&self, token: Option<&str>) -> Result<Option<Identity>, IdentityError> {
        let Some(token) = token else {
            return Ok(None);
        };
        if token == SLOW_TOKEN {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            return Ok(None);
        }
        if token == OUTAGE_TOKEN {
            return Err(IdentityError::Unavailable("jwks timeout".into()));
        }

        let (user, tier) = token
            .split_once(':')
            .ok_or_else(|| IdentityError::Rejected("malformed test token".into()))?;
        let user_id = user
            .parse::<UserId>()
            .map_err(|_| IdentityError::Rejected("bad subject".into()))?;
        let tier = Tier::resolve(Some(tier))?;

        Ok(Some(Identity { user_id, tier }))
    }
}

/// Ledger wrapper that counts reads and can be told to fail.
#[derive(Default)]
pub struct RecordingLedger {
    inner: MemoryLedger,
    fetch_calls: AtomicUsize,
    fail_fetch: AtomicBool,
    fail_append: AtomicBool,
}

impl RecordingLedger {
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn fail_fetches(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    pub fn fail_appends(&self) {
        self.fail_append.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LedgerStore for RecordingLedger {
    async fn fetch_events(
        &self,
        user_id: &UserId,
        since: Option<DateTime<Utc>>,
    ) -> ninja_usage_store::Result<Vec<UsageEvent>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(LEAKY_DETAIL.into()));
        }
        self.inner.fetch_events(user_id, since).await
    }

    async fn append_event(&self, event: &UsageEvent) -> ninja_usage_store::Result<()> {
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(StoreError::Database(LEAKY_DETAIL.into()));
        }
        self.inner.append_event(event).await
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The ledger behind the server.
    pub ledger: Arc<RecordingLedger>,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
    /// The service API key for service-to-service requests.
    pub service_api_key: String,
}

impl TestHarness {
    /// Create a new test harness with default settings.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a new test harness with the given configuration.
    pub fn with_config(config: ServiceConfig) -> Self {
        let ledger = Arc::new(RecordingLedger::default());
        let service_api_key = config
            .service_api_key
            .clone()
            .unwrap_or_else(|| "unset".into());

        let state = AppState::new(ledger.clone(), Arc::new(TestIdentity), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            ledger,
            test_user_id: UserId::generate(),
            service_api_key,
        }
    }

    /// Authorization header for the test user on the given tier.
    pub fn user_auth_header(&self, tier: Tier) -> HeaderValue {
        bearer(&format!("{}:{}", self.test_user_id, tier))
    }

    /// Append an event for the test user directly to the ledger.
    pub async fn seed(&self, score: Option<u32>, at: DateTime<Utc>) {
        let event = UsageEvent::analysis(self.test_user_id, score).with_occurred_at(at);
        self.ledger.append_event(&event).await.unwrap();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A timestamp `offset` into the current billing period.
///
/// Anchoring on the period start keeps seeded events in the same month the
/// handler computes, even when a test runs close to a month boundary.
pub fn this_period(offset: Duration) -> DateTime<Utc> {
    current_period().start() + offset
}

/// A timestamp shortly before the current billing period.
pub fn last_period() -> DateTime<Utc> {
    current_period().start() - Duration::days(3)
}

fn current_period() -> BillingPeriod {
    BillingPeriod::monthly(Utc::now()).unwrap()
}

/// Configuration used by most tests.
pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        service_api_key: Some("test-service-key".into()),
        tier_limits: TierLimits { free: 3, pro: 10 },
        ..ServiceConfig::default()
    }
}

/// Build a bearer authorization value.
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

pub fn api_key_header() -> HeaderName {
    HeaderName::from_static("x-api-key")
}

pub fn header_value(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap()
}
