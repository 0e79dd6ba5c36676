//! Per-identity sliding-window rate limiter.
//!
//! Guards the discussion write path. Each identity (in practice the caller's
//! IP) gets an ordered record of its admitted calls inside the trailing
//! window; once `max_requests` admissions sit inside the window, further
//! calls are rejected until the oldest one ages out.
//!
//! Rejection is a normal outcome, not an error: the HTTP layer translates it
//! to a 429 and limiter state is unaffected by the rejected call.
//!
//! Identity records are created lazily and never pruned, matching the
//! observed production behavior. The table is bounded only by identity churn,
//! which is acceptable for a single-process deployment but worth revisiting
//! for very long uptimes.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default trailing window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10);

/// Default number of admitted writes per identity per window.
pub const DEFAULT_MAX_REQUESTS: usize = 5;

/// Admission control bounding each identity to `max_requests` calls per
/// trailing `window`.
///
/// Thread-safe: share via `Arc<SlidingWindowLimiter>`.
pub struct SlidingWindowLimiter {
    window: Duration,
    max_requests: usize,
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Decide whether a call from `identity` is admitted right now.
    ///
    /// Admitted calls are recorded and count against the identity's next
    /// `window`; rejected calls are not recorded.
    pub fn admit(&self, identity: &str) -> bool {
        self.admit_at(identity, Instant::now())
    }

    /// Number of identities currently tracked.
    pub fn tracked_identities(&self) -> usize {
        self.windows.lock().len()
    }

    fn admit_at(&self, identity: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock();
        let record = windows.entry(identity.to_string()).or_default();

        // Drop admissions that have aged out of the trailing window. The
        // record is ordered, so only the front can be stale.
        if let Some(cutoff) = now.checked_sub(self.window) {
            while record.front().is_some_and(|&t| t <= cutoff) {
                record.pop_front();
            }
        }

        if record.len() >= self.max_requests {
            return false;
        }

        record.push_back(now);
        true
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MAX_REQUESTS)
    }
}
