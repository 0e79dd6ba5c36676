//! Error taxonomy for the discussion store.
//!
//! Every variant is recoverable at the request boundary; none of these should
//! ever terminate the process. The cache and the rate limiter deliberately do
//! not appear here — they communicate through `Option`/`bool` returns and
//! leave the decision to the caller.

/// Errors produced by [`DiscussionStore`](crate::DiscussionStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Input was empty or otherwise unusable after sanitization.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The caller exceeded the write rate for the current window.
    /// Transient: retrying after the window elapses will succeed.
    #[error("too many requests")]
    RateLimited,

    /// The discussion key or comment id does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}
