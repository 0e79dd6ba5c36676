//! Bounded, in-memory discussion threads.
//!
//! [`DiscussionStore`] maps a discussion key (work + chapter, formatted by
//! the caller) to a thread of at most [`MAX_COMMENTS`] comments, each owning
//! at most [`MAX_REPLIES`] replies. Threads are created lazily on first write
//! and never removed — a thread emptied by deletions stays as a zero-length
//! queue.
//!
//! All writes are guarded by the store's [`SlidingWindowLimiter`]; admission
//! is checked before any validation or mutation. A single store-wide mutex
//! covers each logical operation, so evict+insert and like increments are
//! atomic with respect to concurrent callers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::comment::{sanitize, Comment, Reply, MAX_AUTHOR_LEN, MAX_COMMENTS, MAX_TEXT_LEN};
use crate::error::StoreError;
use crate::limiter::SlidingWindowLimiter;
use crate::queue::{BoundedQueue, InsertEnd};

/// Process-wide store of discussion threads.
///
/// Thread-safe: share via `Arc<DiscussionStore>`. Contents live for the
/// lifetime of the process and are lost on restart.
pub struct DiscussionStore {
    threads: Mutex<HashMap<String, BoundedQueue<Comment>>>,
    limiter: SlidingWindowLimiter,
    next_id: AtomicU64,
}

impl DiscussionStore {
    /// Create an empty store whose write path is guarded by `limiter`.
    pub fn new(limiter: SlidingWindowLimiter) -> Self {
        Self {
            threads: Mutex::new(HashMap::new()),
            limiter,
            next_id: AtomicU64::new(1),
        }
    }

    /// All comments under `key`, newest first. Empty if the key is unknown;
    /// never fails and has no side effects.
    pub fn list_comments(&self, key: &str) -> Vec<Comment> {
        let threads = self.threads.lock();
        threads
            .get(key)
            .map(|thread| thread.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Add a comment to the thread under `key`, creating the thread if
    /// needed. When the thread is at capacity the oldest comment is
    /// displaced.
    ///
    /// A `rating` outside 1..=5 is stored as absent rather than rejected.
    pub fn add_comment(
        &self,
        key: &str,
        identity: &str,
        author: &str,
        text: &str,
        rating: Option<u8>,
    ) -> Result<Comment, StoreError> {
        if !self.limiter.admit(identity) {
            return Err(StoreError::RateLimited);
        }
        let (author, text) = clean_author_and_text(author, text)?;
        let rating = rating.filter(|r| (1..=5).contains(r));

        let comment = Comment::new(self.next_id("c"), author, text, rating);

        let mut threads = self.threads.lock();
        let thread = threads
            .entry(key.to_string())
            .or_insert_with(|| BoundedQueue::new(MAX_COMMENTS, InsertEnd::Front));
        if let Some(evicted) = thread.insert(comment.clone()) {
            tracing::debug!(key, evicted_id = %evicted.id, "thread at capacity, displaced oldest comment");
        }

        Ok(comment)
    }

    /// Increment the like counter of a comment. Returns the new count.
    pub fn like_comment(&self, key: &str, comment_id: &str) -> Result<u64, StoreError> {
        let mut threads = self.threads.lock();
        let comment = threads
            .get_mut(key)
            .and_then(|thread| thread.find_mut(|c| c.id == comment_id))
            .ok_or_else(|| StoreError::NotFound(format!("comment {comment_id} in {key}")))?;
        comment.likes += 1;
        Ok(comment.likes)
    }

    /// Append a reply to a comment's reply list, displacing the oldest reply
    /// when the list is at capacity.
    pub fn add_reply(
        &self,
        key: &str,
        comment_id: &str,
        identity: &str,
        author: &str,
        text: &str,
    ) -> Result<Reply, StoreError> {
        if !self.limiter.admit(identity) {
            return Err(StoreError::RateLimited);
        }
        let (author, text) = clean_author_and_text(author, text)?;

        let reply = Reply::new(self.next_id("r"), author, text);

        let mut threads = self.threads.lock();
        let comment = threads
            .get_mut(key)
            .and_then(|thread| thread.find_mut(|c| c.id == comment_id))
            .ok_or_else(|| StoreError::NotFound(format!("comment {comment_id} in {key}")))?;
        if let Some(evicted) = comment.replies.insert(reply.clone()) {
            tracing::debug!(key, comment_id, evicted_id = %evicted.id, "reply list at capacity, displaced oldest reply");
        }

        Ok(reply)
    }

    /// Permanently remove a comment and all of its replies, regardless of age
    /// or likes.
    pub fn delete_comment(&self, key: &str, comment_id: &str) -> Result<(), StoreError> {
        let mut threads = self.threads.lock();
        threads
            .get_mut(key)
            .and_then(|thread| thread.remove_where(|c| c.id == comment_id))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("comment {comment_id} in {key}")))
    }

    /// Run `f` against the thread table. Used by the trending view; keeps the
    /// lock scoped to the closure.
    pub(crate) fn with_threads<R>(
        &self,
        f: impl FnOnce(&HashMap<String, BoundedQueue<Comment>>) -> R,
    ) -> R {
        f(&self.threads.lock())
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}{n:012x}")
    }
}

/// Sanitize and validate the two free-text fields shared by comments and
/// replies. Sanitization runs first, so input that is empty once markup and
/// whitespace are gone is rejected.
fn clean_author_and_text(author: &str, text: &str) -> Result<(String, String), StoreError> {
    let author = sanitize(author, MAX_AUTHOR_LEN);
    if author.is_empty() {
        return Err(StoreError::Validation("author must not be empty".into()));
    }
    let text = sanitize(text, MAX_TEXT_LEN);
    if text.is_empty() {
        return Err(StoreError::Validation("text must not be empty".into()));
    }
    Ok((author, text))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::comment::MAX_REPLIES;

    /// Store with a limiter generous enough to never interfere.
    fn open_store() -> DiscussionStore {
        DiscussionStore::new(SlidingWindowLimiter::new(Duration::from_secs(10), usize::MAX))
    }

    const KEY: &str = "one-piece:1015";
    const IP: &str = "1.2.3.4";

    #[test]
    fn list_comments_on_unknown_key_is_empty() {
        let store = open_store();
        assert!(store.list_comments("nothing:here").is_empty());
    }

    #[test]
    fn add_comment_appears_newest_first() {
        let store = open_store();
        store.add_comment(KEY, IP, "ana", "first", None).unwrap();
        store.add_comment(KEY, IP, "bob", "second", None).unwrap();

        let comments = store.list_comments(KEY);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "second");
        assert_eq!(comments[1].text, "first");
    }

    #[test]
    fn thread_overflow_displaces_the_oldest_comment() {
        let store = open_store();
        let first = store.add_comment(KEY, IP, "a0", "text 0", None).unwrap();
        for i in 1..MAX_COMMENTS {
            store
                .add_comment(KEY, IP, &format!("a{i}"), &format!("text {i}"), None)
                .unwrap();
        }
        assert_eq!(store.list_comments(KEY).len(), MAX_COMMENTS);

        store.add_comment(KEY, IP, "late", "one more", None).unwrap();
        let comments = store.list_comments(KEY);
        assert_eq!(comments.len(), MAX_COMMENTS);
        assert!(comments.iter().all(|c| c.id != first.id));
    }

    #[test]
    fn empty_text_after_sanitization_is_rejected_and_thread_unchanged() {
        let store = open_store();
        store.add_comment(KEY, IP, "ana", "fine", None).unwrap();

        let err = store.add_comment(KEY, IP, "ana", "  <> ", None).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.list_comments(KEY).len(), 1);
    }

    #[test]
    fn empty_author_is_rejected() {
        let store = open_store();
        let err = store.add_comment(KEY, IP, "   ", "hello", None).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn oversized_fields_are_truncated_not_rejected() {
        let store = open_store();
        let long_author = "x".repeat(100);
        let long_text = "y".repeat(2000);
        let comment = store
            .add_comment(KEY, IP, &long_author, &long_text, None)
            .unwrap();
        assert_eq!(comment.author.chars().count(), MAX_AUTHOR_LEN);
        assert_eq!(comment.text.chars().count(), MAX_TEXT_LEN);
    }

    #[test]
    fn out_of_range_rating_is_stored_as_absent() {
        let store = open_store();
        let c = store.add_comment(KEY, IP, "ana", "meh", Some(9)).unwrap();
        assert_eq!(c.rating, None);
        let c = store.add_comment(KEY, IP, "ana", "great", Some(5)).unwrap();
        assert_eq!(c.rating, Some(5));
    }

    #[test]
    fn rate_limited_writes_are_rejected() {
        let store = DiscussionStore::new(SlidingWindowLimiter::new(Duration::from_secs(10), 5));
        for i in 0..5 {
            store
                .add_comment(KEY, IP, "ana", &format!("burst {i}"), None)
                .unwrap();
        }
        let err = store.add_comment(KEY, IP, "ana", "one too many", None).unwrap_err();
        assert!(matches!(err, StoreError::RateLimited));
        // A different caller is unaffected.
        store.add_comment(KEY, "5.6.7.8", "bob", "still fine", None).unwrap();
    }

    #[test]
    fn like_increments_and_missing_ids_are_not_found() {
        let store = open_store();
        let c = store.add_comment(KEY, IP, "ana", "likeable", None).unwrap();

        assert_eq!(store.like_comment(KEY, &c.id).unwrap(), 1);
        assert_eq!(store.like_comment(KEY, &c.id).unwrap(), 2);

        assert!(matches!(
            store.like_comment(KEY, "c000000000ff"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.like_comment("other:key", &c.id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn concurrent_likes_lose_no_updates() {
        let store = Arc::new(open_store());
        let c = store.add_comment(KEY, IP, "ana", "popular", None).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = c.id.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.like_comment(KEY, &id).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let comments = store.list_comments(KEY);
        assert_eq!(comments[0].likes, 800);
    }

    #[test]
    fn replies_are_chronological_and_bounded() {
        let store = open_store();
        let c = store.add_comment(KEY, IP, "ana", "root", None).unwrap();

        let first = store.add_reply(KEY, &c.id, IP, "bob", "reply 0").unwrap();
        for i in 1..=MAX_REPLIES {
            store
                .add_reply(KEY, &c.id, IP, "bob", &format!("reply {i}"))
                .unwrap();
        }

        let comments = store.list_comments(KEY);
        let replies: Vec<_> = comments[0].replies.iter().collect();
        assert_eq!(replies.len(), MAX_REPLIES);
        // Oldest reply was displaced; the rest remain oldest-first.
        assert!(replies.iter().all(|r| r.id != first.id));
        assert_eq!(replies[0].text, "reply 1");
        assert_eq!(replies[MAX_REPLIES - 1].text, format!("reply {MAX_REPLIES}"));
    }

    #[test]
    fn reply_to_missing_comment_is_not_found() {
        let store = open_store();
        store.add_comment(KEY, IP, "ana", "root", None).unwrap();
        assert!(matches!(
            store.add_reply(KEY, "c0000000beef", IP, "bob", "hi"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn delete_cascades_to_replies() {
        let store = open_store();
        let c = store.add_comment(KEY, IP, "ana", "root", None).unwrap();
        for i in 0..10 {
            store.add_reply(KEY, &c.id, IP, "bob", &format!("r{i}")).unwrap();
        }

        store.delete_comment(KEY, &c.id).unwrap();
        assert!(store.list_comments(KEY).is_empty());
        // The comment and its replies are gone for good.
        assert!(matches!(
            store.delete_comment(KEY, &c.id),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.add_reply(KEY, &c.id, IP, "bob", "too late"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn emptied_thread_remains_known() {
        let store = open_store();
        let c = store.add_comment(KEY, IP, "ana", "only one", None).unwrap();
        store.delete_comment(KEY, &c.id).unwrap();

        assert!(store.list_comments(KEY).is_empty());
        // The key still exists as a zero-length thread.
        store.with_threads(|threads| {
            assert!(threads.get(KEY).is_some_and(|t| t.is_empty()));
        });
    }

    #[test]
    fn ids_are_unique_across_comments_and_replies() {
        let store = open_store();
        let mut seen = std::collections::HashSet::new();
        for i in 0..50 {
            let c = store
                .add_comment(KEY, IP, "ana", &format!("c{i}"), None)
                .unwrap();
            assert!(seen.insert(c.id.clone()));
            let r = store.add_reply(KEY, &c.id, IP, "bob", "re").unwrap();
            assert!(seen.insert(r.id));
        }
    }
}
