//! Identity-provider signing keys: fetching and caching.
//!
//! Keys come from a [`KeySource`] (normally the provider's well-known JWKS
//! endpoint) and are cached for a TTL. A lookup for a key id that is not in
//! the cached set always triggers a re-fetch so that key rotation is picked
//! up without a restart.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{JwkSet, PublicKeyUse};
use jsonwebtoken::DecodingKey;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::error::AuthError;

/// Default cache TTL (1 hour).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Verification keys indexed by key id.
pub type SigningKeys = Arc<HashMap<String, DecodingKey>>;

#[derive(Debug, Error)]
pub enum KeyFetchError {
    #[error("JWKS endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("JWKS endpoint returned HTTP {0}")]
    Status(u16),
    #[error("malformed JWKS document: {0}")]
    Malformed(String),
}

/// Where signing keys come from.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, KeyFetchError>;
}

/// Fetches the key set from a JWKS URL.
#[derive(Debug, Clone)]
pub struct HttpKeySource {
    url: String,
    client: reqwest::Client,
}

impl HttpKeySource {
    pub fn new(url: impl Into<String>) -> Result<Self, KeyFetchError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| KeyFetchError::Unreachable(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch(&self) -> Result<JwkSet, KeyFetchError> {
        debug!(url = %self.url, "jwks.fetch");

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| KeyFetchError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyFetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| KeyFetchError::Unreachable(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| KeyFetchError::Malformed(e.to_string()))
    }
}

/// A fixed key set, for pinned keys and tests.
#[derive(Debug, Clone)]
pub struct StaticKeySource {
    keys: JwkSet,
}

impl StaticKeySource {
    pub fn new(keys: JwkSet) -> Self {
        Self { keys }
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn fetch(&self) -> Result<JwkSet, KeyFetchError> {
        Ok(self.keys.clone())
    }
}

struct CachedKeys {
    keys: SigningKeys,
    fetched_at: Instant,
}

/// Caching front for a [`KeySource`].
///
/// The cached map is immutable once built; refreshes swap in a new map, so
/// readers never observe a partially populated set.
pub struct KeyProvider {
    source: Arc<dyn KeySource>,
    ttl: Duration,
    cache: RwLock<Option<CachedKeys>>,
}

impl fmt::Debug for KeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyProvider")
            .field("ttl", &self.ttl)
            .field("cached", &self.cache.read().as_ref().map(|c| c.keys.len()))
            .finish_non_exhaustive()
    }
}

impl KeyProvider {
    pub fn new(source: Arc<dyn KeySource>) -> Self {
        Self::with_ttl(source, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(source: Arc<dyn KeySource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: RwLock::new(None),
        }
    }

    /// All currently valid signing keys, fetching them if the cache is empty
    /// or older than the TTL.
    pub async fn signing_keys(&self) -> Result<SigningKeys, AuthError> {
        if let Some(keys) = self.fresh_keys() {
            return Ok(keys);
        }
        self.refresh().await
    }

    /// Key for `kid`; an unknown kid forces a re-fetch before giving up.
    pub async fn key_for(&self, kid: &str) -> Result<Option<DecodingKey>, AuthError> {
        if let Some(key) = self.fresh_keys().and_then(|keys| keys.get(kid).cloned()) {
            return Ok(Some(key));
        }

        let keys = self.refresh().await?;
        if !keys.contains_key(kid) {
            debug!(kid, "jwks.kid_not_found");
        }
        Ok(keys.get(kid).cloned())
    }

    fn fresh_keys(&self) -> Option<SigningKeys> {
        let cache = self.cache.read();
        cache
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.ttl)
            .map(|c| Arc::clone(&c.keys))
    }

    async fn refresh(&self) -> Result<SigningKeys, AuthError> {
        let set = self.source.fetch().await.map_err(|e| {
            warn!(error = %e, "jwks.fetch_failed");
            AuthError::invalid_header("Unable to fetch signing keys.")
        })?;

        let keys: SigningKeys = Arc::new(index_keys(&set));
        info!(count = keys.len(), "jwks.refreshed");

        *self.cache.write() = Some(CachedKeys {
            keys: Arc::clone(&keys),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }
}

fn index_keys(set: &JwkSet) -> HashMap<String, DecodingKey> {
    let mut keys = HashMap::with_capacity(set.keys.len());

    for jwk in &set.keys {
        let Some(kid) = jwk.common.key_id.as_deref() else {
            debug!("jwks.skip_key_without_kid");
            continue;
        };

        if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
            debug!(kid, "jwks.skip_encryption_key");
            continue;
        }

        match DecodingKey::from_jwk(jwk) {
            Ok(key) => {
                keys.insert(kid.to_string(), key);
            }
            Err(e) => warn!(kid, error = %e, "jwks.skip_unusable_key"),
        }
    }

    keys
}
