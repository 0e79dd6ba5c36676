//! API route definitions.
//!
//! ## Routes
//!
//! - `GET /health` - Health check
//! - `GET /trending` - Busiest discussion threads (top 10)
//! - `GET /{work_slug}/{sub_unit}` - List a thread's comments
//! - `POST /{work_slug}/{sub_unit}` - Add a comment (400/429)
//! - `POST /{work_slug}/{sub_unit}/{comment_id}/like` - Like a comment (404)
//! - `POST /{work_slug}/{sub_unit}/{comment_id}/reply` - Reply to a comment (400/429/404)
//! - `DELETE /{work_slug}/{sub_unit}/{comment_id}` - Delete a comment (404)

mod comments;
mod health;
mod trending;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/trending", get(trending::trending))
        .route(
            "/{work_slug}/{sub_unit}",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/{work_slug}/{sub_unit}/{comment_id}",
            delete(comments::delete_comment),
        )
        .route(
            "/{work_slug}/{sub_unit}/{comment_id}/like",
            post(comments::like_comment),
        )
        .route(
            "/{work_slug}/{sub_unit}/{comment_id}/reply",
            post(comments::create_reply),
        )
        .with_state(state)
}
