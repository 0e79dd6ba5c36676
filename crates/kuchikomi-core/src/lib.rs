//! Kuchikomi Core - ephemeral in-process state for the kuchikomi service.
//!
//! Everything in this crate lives in process memory for the lifetime of the
//! process: nothing is persisted, and nothing is shared across server
//! instances. The crate provides three independent pieces of bounded,
//! time-aware, concurrently accessed state:
//!
//! - [`ExpiringCache`]: a generic key/value cache with a fixed TTL, used to
//!   front slow external metadata lookups. Expiry is enforced lazily on read.
//! - [`SlidingWindowLimiter`]: per-identity admission control over a trailing
//!   time window, guarding the discussion write path against bursts.
//! - [`DiscussionStore`]: capacity-bounded comment threads (with nested
//!   replies) keyed by work + chapter, built on [`BoundedQueue`]. The
//!   [`TrendingIndex`] is a derived, stateless ranking over the store.
//!
//! All structures use interior mutability (`parking_lot`) and are safe to
//! share behind an `Arc` across request handlers.
//!
//! # Deployment constraint
//!
//! The limiter and the cache are only correct when exactly one process owns
//! all state. Running multiple instances behind a load balancer would give
//! each instance its own independent windows and caches.

pub mod cache;
pub mod comment;
pub mod error;
pub mod limiter;
pub mod queue;
pub mod store;
pub mod trending;

pub use cache::ExpiringCache;
pub use comment::{Comment, Reply, MAX_COMMENTS, MAX_REPLIES};
pub use error::StoreError;
pub use limiter::SlidingWindowLimiter;
pub use queue::{BoundedQueue, InsertEnd};
pub use store::DiscussionStore;
pub use trending::{TrendingIndex, TrendingThread};
