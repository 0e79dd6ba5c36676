//! Kuchikomi Serve - HTTP API for ephemeral chapter discussions.
//!
//! This crate exposes the state layer of [`kuchikomi_core`] over a small JSON
//! API: per-chapter comment threads with replies and likes, plus a trending
//! ranking. All state is in process memory and lost on restart by design.
//!
//! # Architecture
//!
//! - **Routes**: axum handlers mapping one-to-one onto store operations
//! - **State**: [`AppState`] owns the store and metadata caches; created once
//!   in `main` and cloned into handlers (no globals)
//! - **Fetch**: [`fetch::get_or_fetch`] fronts external metadata collaborators
//!   with per-class TTL caches and an explicit timeout
//!
//! # Deployment constraint
//!
//! Rate limiting and caching are process-local. Run exactly one instance;
//! multiple instances would each keep independent windows and caches.

pub mod config;
pub mod error;
pub mod fetch;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
