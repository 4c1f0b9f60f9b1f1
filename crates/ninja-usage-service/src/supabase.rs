//! Supabase access token verification.
//!
//! Supabase issues JWTs signed either with the project's shared secret
//! (HS256) or with asymmetric keys published at
//! `{SUPABASE_URL}/auth/v1/.well-known/jwks.json` (RS256 / ES256). The
//! subscription tier travels in `app_metadata.tier`, which only the service
//! role can write.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use ninja_usage_core::{Tier, UserId};

use crate::identity::{Identity, IdentityError, IdentityProvider};

// ============================================================================
// Constants
// ============================================================================

/// How long to cache JWKS keys before refreshing.
const JWKS_CACHE_DURATION: Duration = Duration::from_secs(3600); // 1 hour

/// Timeout for JWKS fetch requests.
const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Claims this service reads from a Supabase access token.
#[derive(Debug, Clone, Deserialize)]
struct SupabaseClaims {
    /// Subject (user ID).
    sub: String,
    /// Server-controlled user metadata.
    #[serde(default)]
    app_metadata: Option<AppMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
struct AppMetadata {
    #[serde(default)]
    tier: Option<String>,
}

/// JWKS (JSON Web Key Set) response structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    /// List of JWK keys.
    pub keys: Vec<Jwk>,
}

/// Single JSON Web Key.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type ("RSA" or "EC").
    pub kty: String,
    /// Key ID.
    pub kid: Option<String>,
    /// RSA public key modulus (base64url encoded).
    pub n: Option<String>,
    /// RSA public key exponent (base64url encoded).
    pub e: Option<String>,
    /// EC public key x coordinate (base64url encoded).
    pub x: Option<String>,
    /// EC public key y coordinate (base64url encoded).
    pub y: Option<String>,
}

/// Cached verification keys.
struct JwksCache {
    /// Keys mapped by kid.
    keys: HashMap<String, DecodingKey>,
    /// Key for tokens without a kid (first usable key in the set).
    default_key: Option<DecodingKey>,
    /// When the cache was last filled; `None` until the first fetch.
    last_updated: Option<Instant>,
}

impl JwksCache {
    fn is_expired(&self) -> bool {
        self.last_updated
            .map_or(true, |at| at.elapsed() >= JWKS_CACHE_DURATION)
    }

    fn lookup(&self, kid: Option<&str>) -> Option<DecodingKey> {
        match kid {
            Some(kid) => self.keys.get(kid).cloned(),
            None => self.default_key.clone(),
        }
    }
}

/// Identity provider backed by Supabase Auth tokens.
pub struct SupabaseIdentity {
    issuer: String,
    audience: String,
    jwks_url: String,
    secret: Option<DecodingKey>,
    /// Reused across JWKS fetches for connection pooling.
    client: reqwest::Client,
    jwks: RwLock<JwksCache>,
}

impl SupabaseIdentity {
    /// Create a provider for the Supabase project at `supabase_url`.
    ///
    /// With `jwt_secret`, HS256 tokens signed by the project secret are
    /// accepted; asymmetric tokens are always verified against the JWKS.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Unavailable` if the HTTP client cannot be built.
    pub fn new(
        supabase_url: &str,
        audience: &str,
        jwt_secret: Option<&str>,
    ) -> Result<Self, IdentityError> {
        let base = supabase_url.trim_end_matches('/');
        let client = reqwest::Client::builder()
            .timeout(JWKS_FETCH_TIMEOUT)
            .build()
            .map_err(|e| IdentityError::Unavailable(format!("http client: {e}")))?;

        Ok(Self {
            issuer: format!("{base}/auth/v1"),
            audience: audience.to_string(),
            jwks_url: format!("{base}/auth/v1/.well-known/jwks.json"),
            secret: jwt_secret.map(|s| DecodingKey::from_secret(s.as_bytes())),
            client,
            jwks: RwLock::new(JwksCache {
                keys: HashMap::new(),
                default_key: None,
                last_updated: None,
            }),
        })
    }

    /// Get a decoding key from cache or refresh the JWKS.
    async fn jwks_key(&self, kid: Option<&str>) -> Result<DecodingKey, IdentityError> {
        {
            let cache = self.jwks.read().await;
            if !cache.is_expired() {
                if let Some(key) = cache.lookup(kid) {
                    return Ok(key);
                }
            }
        }

        // Cache miss or expired - fetch JWKS
        let jwks = self.fetch_jwks().await?;

        let mut cache = self.jwks.write().await;
        cache.keys.clear();
        cache.default_key = None;
        cache.last_updated = Some(Instant::now());

        for jwk in &jwks.keys {
            if let Some(decoding_key) = jwk_to_decoding_key(jwk) {
                if let Some(ref key_kid) = jwk.kid {
                    cache.keys.insert(key_kid.clone(), decoding_key.clone());
                }
                if cache.default_key.is_none() {
                    cache.default_key = Some(decoding_key);
                }
            }
        }

        cache
            .lookup(kid)
            .ok_or_else(|| IdentityError::Rejected("no matching signing key".into()))
    }

    /// Fetch the JWKS from Supabase Auth.
    async fn fetch_jwks(&self) -> Result<Jwks, IdentityError> {
        tracing::debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self.client.get(&self.jwks_url).send().await.map_err(|e| {
            tracing::error!(error = %e, url = %self.jwks_url, "Failed to fetch JWKS");
            IdentityError::Unavailable("failed to fetch signing keys".into())
        })?;

        if !response.status().is_success() {
            tracing::error!(
                status = %response.status(),
                url = %self.jwks_url,
                "JWKS fetch returned non-success status"
            );
            return Err(IdentityError::Unavailable(format!(
                "JWKS endpoint returned {}",
                response.status()
            )));
        }

        let jwks: Jwks = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse JWKS response");
            IdentityError::Unavailable("failed to parse signing keys".into())
        })?;

        tracing::info!(keys_count = %jwks.keys.len(), "JWKS fetched successfully");

        Ok(jwks)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn current_user(&self, token: Option<&str>) -> Result<Option<Identity>, IdentityError> {
        let Some(token) = token else {
            return Ok(None);
        };

        let header = decode_header(token)
            .map_err(|e| IdentityError::Rejected(format!("malformed header: {e}")))?;

        let key = match header.alg {
            Algorithm::HS256 => self
                .secret
                .clone()
                .ok_or_else(|| IdentityError::Rejected("HS256 tokens not accepted".into()))?,
            Algorithm::RS256 | Algorithm::ES256 => self.jwks_key(header.kid.as_deref()).await?,
            other => {
                return Err(IdentityError::Rejected(format!(
                    "unsupported algorithm {other:?}"
                )))
            }
        };

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let claims = decode::<SupabaseClaims>(token, &key, &validation)
            .map_err(|e| IdentityError::Rejected(e.to_string()))?
            .claims;

        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| IdentityError::Rejected("subject is not a UUID".into()))?;

        let tier_claim = claims.app_metadata.as_ref().and_then(|m| m.tier.as_deref());
        let tier = Tier::resolve(tier_claim)?;

        Ok(Some(Identity { user_id, tier }))
    }
}

/// Convert a JWK to a `DecodingKey`.
fn jwk_to_decoding_key(jwk: &Jwk) -> Option<DecodingKey> {
    match jwk.kty.as_str() {
        "RSA" => DecodingKey::from_rsa_components(jwk.n.as_ref()?, jwk.e.as_ref()?).ok(),
        "EC" => DecodingKey::from_ec_components(jwk.x.as_ref()?, jwk.y.as_ref()?).ok(),
        other => {
            tracing::debug!(kty = %other, "Skipping unsupported JWK");
            None
        }
    }
}
