//! Application state.

use std::sync::Arc;

use ninja_usage_store::LedgerStore;

use crate::config::ServiceConfig;
use crate::identity::IdentityProvider;

/// Application state shared across handlers.
///
/// The ledger and identity provider are passed in rather than reached
/// globally, so tests can swap either one.
#[derive(Clone)]
pub struct AppState {
    /// The usage ledger.
    pub ledger: Arc<dyn LedgerStore>,

    /// Resolves callers from their access tokens.
    pub identity: Arc<dyn IdentityProvider>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        identity: Arc<dyn IdentityProvider>,
        config: ServiceConfig,
    ) -> Self {
        if config.service_api_key.is_none() {
            tracing::warn!("SERVICE_API_KEY not configured - usage ingestion is disabled");
        }

        Self {
            ledger,
            identity,
            config,
        }
    }
}
