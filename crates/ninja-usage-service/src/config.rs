//! Service configuration.

use std::str::FromStr;

use ninja_usage_core::{TierLimits, DEFAULT_FREE_CREDITS, DEFAULT_PRO_CREDITS};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// PostgreSQL connection string for the usage ledger.
    /// Without it the service keeps usage in memory.
    pub database_url: Option<String>,

    /// Maximum pooled database connections (default: 10).
    pub database_max_connections: u32,

    /// Supabase project URL (default: `<http://localhost:54321>`).
    pub supabase_url: String,

    /// Supabase JWT secret for HS256 tokens (optional).
    pub supabase_jwt_secret: Option<String>,

    /// Expected JWT audience (default: "authenticated").
    pub auth_audience: String,

    /// Service API key for service-to-service auth.
    pub service_api_key: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Per-period credit caps.
    pub tier_limits: TierLimits,

    /// Send `Strict-Transport-Security` on every response.
    pub enforce_hsts: bool,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            database_url: non_empty_var("DATABASE_URL"),
            database_max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            ),
            supabase_url: std::env::var("SUPABASE_URL").unwrap_or(defaults.supabase_url),
            supabase_jwt_secret: non_empty_var("SUPABASE_JWT_SECRET"),
            auth_audience: std::env::var("AUTH_AUDIENCE").unwrap_or(defaults.auth_audience),
            service_api_key: non_empty_var("SERVICE_API_KEY"),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| parse_origins(&s))
                .unwrap_or(defaults.cors_origins),
            max_body_bytes: parse_var("MAX_BODY_BYTES", defaults.max_body_bytes),
            request_timeout_seconds: parse_var(
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
            tier_limits: TierLimits {
                free: parse_var("FREE_TIER_CREDITS", DEFAULT_FREE_CREDITS),
                pro: parse_var("PRO_TIER_CREDITS", DEFAULT_PRO_CREDITS),
            },
            enforce_hsts: std::env::var("ENFORCE_HSTS")
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or(defaults.enforce_hsts),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            database_url: None,
            database_max_connections: 10,
            supabase_url: "http://localhost:54321".into(),
            supabase_jwt_secret: None,
            auth_audience: "authenticated".into(),
            service_api_key: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
            tier_limits: TierLimits::default(),
            enforce_hsts: false,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back (with a warning) when it is malformed.
fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key = %key, value = %raw, "Ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
