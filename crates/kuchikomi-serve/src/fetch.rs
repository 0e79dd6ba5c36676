//! Cache-fronted access to external metadata collaborators.
//!
//! The upstream services (media-metadata GraphQL, chapter listings) are slow
//! and rate-limited, so every lookup goes through an [`ExpiringCache`] first.
//! Entries store serialized JSON, keyed by a deterministic function of the
//! logical request.
//!
//! ## Cache Key Strategy
//!
//! Cache keys should include the endpoint name and all parameters that affect
//! the response, e.g. `"search:one piece"` or `"chapters:12345"`.
//!
//! ## TTL Guidelines
//!
//! | Data Type | TTL | Examples |
//! |-----------|-----|----------|
//! | Metadata lookups | 20 min | title search, work details |
//! | Sitemap document | 30 min | generated sitemap |
//! | Recommendations | 60 min | generated suggestion lists |

use std::future::Future;
use std::time::Duration;

use kuchikomi_core::ExpiringCache;
use serde::{de::DeserializeOwned, Serialize};

/// Upstream calls that exceed this deadline are treated as failed and leave
/// the cache unmodified.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Common TTL values for the metadata caches.
pub mod ttl {
    use std::time::Duration;

    /// Metadata lookups (title search, work details) - 20 minutes
    pub const SEARCH: Duration = Duration::from_secs(20 * 60);

    /// Generated sitemap document - 30 minutes
    pub const SITEMAP: Duration = Duration::from_secs(30 * 60);

    /// Generated recommendation lists - 60 minutes
    pub const RECOMMENDATIONS: Duration = Duration::from_secs(60 * 60);
}

/// One [`ExpiringCache`] per TTL class.
///
/// Metadata handlers pick the cache matching their data class and go through
/// [`get_or_fetch`]; entries in one class never affect another.
pub struct MetadataCaches {
    /// Title search and work details (20 min).
    pub search: ExpiringCache<String>,
    /// Generated sitemap document (30 min).
    pub sitemap: ExpiringCache<String>,
    /// Generated recommendation lists (60 min).
    pub recommendations: ExpiringCache<String>,
}

impl MetadataCaches {
    pub fn new() -> Self {
        Self {
            search: ExpiringCache::new(ttl::SEARCH),
            sitemap: ExpiringCache::new(ttl::SITEMAP),
            recommendations: ExpiringCache::new(ttl::RECOMMENDATIONS),
        }
    }
}

impl Default for MetadataCaches {
    fn default() -> Self {
        Self::new()
    }
}

/// Get a cached value or fetch and cache it.
///
/// This is the main caching helper. It:
/// 1. Checks the cache for a valid entry under `key`
/// 2. If found, deserializes and returns it
/// 3. If not found, runs `fetch` under [`FETCH_TIMEOUT`]
/// 4. Caches the result and returns it
///
/// Fetch failures (including timeouts) propagate to the caller with the
/// cache left untouched; cache misses themselves are never an error.
pub async fn get_or_fetch<T, F, Fut>(
    cache: &ExpiringCache<String>,
    key: &str,
    fetch: F,
) -> anyhow::Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    // Check cache first
    if let Some(json) = cache.get(key) {
        match serde_json::from_str(&json) {
            Ok(value) => {
                tracing::debug!(key = %key, "cache hit");
                return Ok(value);
            }
            Err(e) => {
                // Corrupted cache entry - log and continue to refetch
                tracing::warn!(key = %key, error = %e, "failed to deserialize cached entry");
            }
        }
    }

    tracing::debug!(key = %key, "cache miss, fetching");
    let value = tokio::time::timeout(FETCH_TIMEOUT, fetch())
        .await
        .map_err(|_| anyhow::anyhow!("metadata fetch for {key:?} timed out"))??;

    // Serialize and cache the result
    match serde_json::to_string(&value) {
        Ok(json) => cache.set(key, json),
        Err(e) => {
            // Failed to serialize - log but still return the value
            tracing::warn!(key = %key, error = %e, "failed to serialize for cache");
        }
    }

    Ok(value)
}
