//! Resume Ninja Usage Service - HTTP API for usage stats and credits
//!
//! This is the main entry point for the usage service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ninja_usage_service::{create_router, AppState, ServiceConfig, SupabaseIdentity};
use ninja_usage_store::{LedgerStore, MemoryLedger, PgLedger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ninja_usage=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Resume Ninja usage service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        database_configured = %config.database_url.is_some(),
        supabase_url = %config.supabase_url,
        hs256_enabled = %config.supabase_jwt_secret.is_some(),
        free_credits = config.tier_limits.free,
        pro_credits = config.tier_limits.pro,
        enforce_hsts = %config.enforce_hsts,
        "Service configuration loaded"
    );

    // Initialize the usage ledger
    let ledger: Arc<dyn LedgerStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to PostgreSQL ledger");
            Arc::new(PgLedger::connect(url, config.database_max_connections).await?)
        }
        None => {
            tracing::warn!("DATABASE_URL not configured - usage is kept in memory only");
            Arc::new(MemoryLedger::new())
        }
    };

    let identity = Arc::new(SupabaseIdentity::new(
        &config.supabase_url,
        &config.auth_audience,
        config.supabase_jwt_secret.as_deref(),
    )?);

    // Build app state
    let state = AppState::new(ledger, identity, config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve once Ctrl-C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
