//! Generic TTL cache with lazy expiry.
//!
//! [`ExpiringCache`] fronts slow external metadata lookups. Each entry records
//! the instant it was written; a read past the TTL removes the entry and
//! reports a miss. There is no background sweeper — an entry that is never
//! read again simply sits until the next `set` overwrites it or the process
//! exits.
//!
//! The cache is a best-effort accelerator: it has no error conditions, and a
//! miss must never surface to the user as a failure, only as a fallback fetch
//! from the upstream collaborator.
//!
//! ## Cache Key Strategy
//!
//! Keys are opaque strings the caller builds deterministically from the
//! logical request, e.g. `"search:one piece"` or `"chapters:12345"`, so that
//! identical requests map to the same entry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A value plus the instant it was written.
struct CacheEntry<V> {
    value: V,
    written_at: Instant,
}

/// Key/value store where entries become invisible `ttl` after their last
/// write.
///
/// Thread-safe: share via `Arc<ExpiringCache<V>>`. Values are cloned out on
/// read, so `V` is typically something cheap to clone (a `String` of
/// serialized JSON, an `Arc`, a small struct).
pub struct ExpiringCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> ExpiringCache<V> {
    /// Create an empty cache whose entries live for `ttl` after each write.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up `key`, treating entries older than the TTL as absent.
    ///
    /// An expired entry is removed as a side effect of the read that
    /// discovers it.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Store `value` under `key`, unconditionally overwriting any previous
    /// entry and resetting its age to zero.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Instant::now())
    }

    /// Number of entries currently stored, including not-yet-purged expired
    /// ones.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache currently stores no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(key) {
            if now.duration_since(entry.written_at) < self.ttl {
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }
        None
    }

    fn set_at(&self, key: impl Into<String>, value: V, now: Instant) {
        self.entries.lock().insert(
            key.into(),
            CacheEntry {
                value,
                written_at: now,
            },
        );
    }
}
