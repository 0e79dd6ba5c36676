//! Application state shared across all request handlers.

use std::sync::Arc;

use kuchikomi_core::{DiscussionStore, SlidingWindowLimiter};

use crate::config::Config;
use crate::fetch::{ttl, MetadataCaches};

/// Shared application state available to all request handlers.
///
/// Created once in `main` with process lifetime; handlers receive clones.
/// Everything here is in-memory only and starts empty on each boot.
#[derive(Clone)]
pub struct AppState {
    /// Discussion threads, rate-limited internally on the write path.
    pub store: Arc<DiscussionStore>,

    /// TTL caches fronting external metadata lookups, one per data class.
    /// Values are serialized JSON keyed by logical request (e.g.,
    /// "search:<query>").
    pub metadata: Arc<MetadataCaches>,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new application state from configuration.
    pub fn new(config: Config) -> Self {
        let limiter = SlidingWindowLimiter::new(config.rate_window, config.rate_max_requests);
        let store = Arc::new(DiscussionStore::new(limiter));
        let metadata = Arc::new(MetadataCaches::new());

        tracing::info!(
            rate_window_secs = config.rate_window.as_secs(),
            rate_max_requests = config.rate_max_requests,
            search_ttl_secs = ttl::SEARCH.as_secs(),
            sitemap_ttl_secs = ttl::SITEMAP.as_secs(),
            recommendations_ttl_secs = ttl::RECOMMENDATIONS.as_secs(),
            "application state initialized"
        );

        Self {
            store,
            metadata,
            config: Arc::new(config),
        }
    }
}
