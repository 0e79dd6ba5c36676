//! Comment and reply records plus input sanitization.
//!
//! A thread holds at most [`MAX_COMMENTS`] comments, newest first; each
//! comment owns at most [`MAX_REPLIES`] replies, oldest first. Both bounds
//! are enforced destructively by [`BoundedQueue`]: inserting past capacity
//! displaces the oldest element rather than failing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::queue::{BoundedQueue, InsertEnd};

/// Maximum comments kept per discussion thread.
pub const MAX_COMMENTS: usize = 200;

/// Maximum replies kept per comment.
pub const MAX_REPLIES: usize = 50;

/// Maximum author name length, in characters, after sanitization.
pub const MAX_AUTHOR_LEN: usize = 30;

/// Maximum comment/reply text length, in characters, after sanitization.
pub const MAX_TEXT_LEN: usize = 500;

/// A top-level comment in a discussion thread.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    /// Opaque token, unique for the lifetime of the store.
    pub id: String,
    pub author: String,
    pub text: String,
    /// Star rating 1..=5. Out-of-range ratings are stored as absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub likes: u64,
    /// Replies in chronological order, oldest first.
    pub replies: BoundedQueue<Reply>,
}

impl Comment {
    pub(crate) fn new(
        id: String,
        author: String,
        text: String,
        rating: Option<u8>,
    ) -> Self {
        Self {
            id,
            author,
            text,
            rating,
            created_at: Utc::now(),
            likes: 0,
            replies: BoundedQueue::new(MAX_REPLIES, InsertEnd::Back),
        }
    }
}

/// A reply nested under a comment. Owned by its parent and deleted with it.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    /// Opaque token, unique for the lifetime of the store.
    pub id: String,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub likes: u64,
}

impl Reply {
    pub(crate) fn new(id: String, author: String, text: String) -> Self {
        Self {
            id,
            author,
            text,
            created_at: Utc::now(),
            likes: 0,
        }
    }
}

/// Clean untrusted author/text input.
///
/// Strips angle brackets (the sole markup-injection defense for these
/// plain-text fields), trims surrounding whitespace, then truncates to
/// `max_len` characters. Runs before emptiness/length validation, so an
/// input that is only markup comes out empty and gets rejected.
pub(crate) fn sanitize(input: &str, max_len: usize) -> String {
    let stripped: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    stripped.trim().chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_angle_brackets() {
        assert_eq!(sanitize("<script>alert(1)</script>", 500), "scriptalert(1)/script");
    }

    #[test]
    fn sanitize_trims_whitespace() {
        assert_eq!(sanitize("  hello  ", 500), "hello");
    }

    #[test]
    fn sanitize_truncates_after_stripping_and_trimming() {
        // Stripping happens first, so brackets do not count against the
        // length budget.
        assert_eq!(sanitize("<<ab>>cd", 3), "abc");
        // Truncation respects char boundaries, not bytes.
        assert_eq!(sanitize("日本語のテスト", 3), "日本語");
    }

    #[test]
    fn sanitize_markup_only_input_becomes_empty() {
        assert_eq!(sanitize("<>", 30), "");
        assert_eq!(sanitize("  <  >  ", 30), "");
    }

    #[test]
    fn comment_serializes_without_absent_rating() {
        let c = Comment::new("c1".into(), "ana".into(), "nice".into(), None);
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("rating").is_none());
        assert_eq!(json["replies"], serde_json::json!([]));
        assert_eq!(json["likes"], 0);
    }

    #[test]
    fn comment_serializes_rating_when_present() {
        let c = Comment::new("c1".into(), "ana".into(), "nice".into(), Some(4));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["rating"], 4);
    }
}
