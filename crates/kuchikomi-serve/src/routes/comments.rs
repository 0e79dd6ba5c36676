//! Discussion thread endpoints.
//!
//! Each handler maps one-to-one onto a [`DiscussionStore`] operation. The
//! discussion key is `"{work_slug}:{sub_unit}"`; both segments are opaque to
//! the store. Write paths identify the caller by IP for rate limiting.
//!
//! [`DiscussionStore`]: kuchikomi_core::DiscussionStore

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path, State};
use axum::http::HeaderMap;
use axum::Json;
use kuchikomi_core::{Comment, Reply};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /{work_slug}/{sub_unit}`.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub username: String,
    pub text: String,
    /// Star rating 1..=5. Non-integral or out-of-range numbers are stored as
    /// absent, not rejected.
    pub rating: Option<serde_json::Number>,
}

/// Request body for the reply endpoint.
#[derive(Debug, Deserialize)]
pub struct CreateReplyRequest {
    pub username: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CommentCreatedResponse {
    pub success: bool,
    pub comment: Comment,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub success: bool,
    pub likes: u64,
}

#[derive(Debug, Serialize)]
pub struct ReplyCreatedResponse {
    pub success: bool,
    pub reply: Reply,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
}

/// `GET /{work_slug}/{sub_unit}`
///
/// Returns the thread's comments, newest first. Unknown keys yield an empty
/// list; this endpoint never fails.
pub async fn list_comments(
    State(state): State<AppState>,
    Path((work_slug, sub_unit)): Path<(String, String)>,
) -> Json<CommentsResponse> {
    let comments = state.store.list_comments(&discussion_key(&work_slug, &sub_unit));
    let total = comments.len();
    Json(CommentsResponse { comments, total })
}

/// `POST /{work_slug}/{sub_unit}`
///
/// Adds a comment. 400 on empty author/text after sanitization, 429 when the
/// caller exceeds the write rate.
pub async fn create_comment(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path((work_slug, sub_unit)): Path<(String, String)>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<Json<CommentCreatedResponse>, ApiError> {
    let identity = caller_identity(&headers, addr);
    let rating = body
        .rating
        .and_then(|n| n.as_i64())
        .and_then(|r| u8::try_from(r).ok());
    let comment = state.store.add_comment(
        &discussion_key(&work_slug, &sub_unit),
        &identity,
        &body.username,
        &body.text,
        rating,
    )?;
    tracing::debug!(work_slug, sub_unit, comment_id = %comment.id, "comment created");
    Ok(Json(CommentCreatedResponse {
        success: true,
        comment,
    }))
}

/// `POST /{work_slug}/{sub_unit}/{comment_id}/like`
///
/// Increments a comment's like counter. 404 if the thread or comment is
/// unknown.
pub async fn like_comment(
    State(state): State<AppState>,
    Path((work_slug, sub_unit, comment_id)): Path<(String, String, String)>,
) -> Result<Json<LikeResponse>, ApiError> {
    let likes = state
        .store
        .like_comment(&discussion_key(&work_slug, &sub_unit), &comment_id)?;
    Ok(Json(LikeResponse {
        success: true,
        likes,
    }))
}

/// `POST /{work_slug}/{sub_unit}/{comment_id}/reply`
///
/// Appends a reply to a comment. 400/429 as for comment creation, 404 if the
/// parent comment is unknown.
pub async fn create_reply(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path((work_slug, sub_unit, comment_id)): Path<(String, String, String)>,
    Json(body): Json<CreateReplyRequest>,
) -> Result<Json<ReplyCreatedResponse>, ApiError> {
    let identity = caller_identity(&headers, addr);
    let reply = state.store.add_reply(
        &discussion_key(&work_slug, &sub_unit),
        &comment_id,
        &identity,
        &body.username,
        &body.text,
    )?;
    Ok(Json(ReplyCreatedResponse {
        success: true,
        reply,
    }))
}

/// `DELETE /{work_slug}/{sub_unit}/{comment_id}`
///
/// Permanently removes a comment and its replies. 404 if unknown.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path((work_slug, sub_unit, comment_id)): Path<(String, String, String)>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state
        .store
        .delete_comment(&discussion_key(&work_slug, &sub_unit), &comment_id)?;
    tracing::debug!(work_slug, sub_unit, comment_id, "comment deleted");
    Ok(Json(DeletedResponse { success: true }))
}

/// Storage key for one thread.
fn discussion_key(work_slug: &str, sub_unit: &str) -> String {
    format!("{work_slug}:{sub_unit}")
}

/// Identity used for rate limiting: first X-Forwarded-For hop when present
/// (we expect to sit behind a proxy), otherwise the socket peer address.
fn caller_identity(headers: &HeaderMap, addr: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}
