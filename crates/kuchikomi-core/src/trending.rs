//! Derived ranking of discussion keys by thread size.
//!
//! [`TrendingIndex`] holds no state of its own: every call to [`top`]
//! recomputes the ranking from the store under its lock. Thread counts are
//! small (bounded by key churn) so a full scan per request is fine.
//!
//! [`top`]: TrendingIndex::top

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::DiscussionStore;

/// One row of the trending ranking.
///
/// Serializes as `{key, commentCount, mostRecentTimestamp}`; the timestamp
/// is null for threads emptied by deletions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingThread {
    /// Discussion key, e.g. `"one-piece:1015"`.
    pub key: String,
    pub comment_count: usize,
    /// Creation time of the newest comment; `None` for emptied threads.
    #[serde(rename = "mostRecentTimestamp")]
    pub most_recent: Option<DateTime<Utc>>,
}

/// Read-only view over a [`DiscussionStore`] ranking keys by comment count.
pub struct TrendingIndex<'a> {
    store: &'a DiscussionStore,
}

impl<'a> TrendingIndex<'a> {
    pub fn new(store: &'a DiscussionStore) -> Self {
        Self { store }
    }

    /// The `n` busiest discussion keys, descending by comment count. Ties
    /// keep the underlying iteration order.
    pub fn top(&self, n: usize) -> Vec<TrendingThread> {
        let mut rows = self.store.with_threads(|threads| {
            threads
                .iter()
                .map(|(key, thread)| TrendingThread {
                    key: key.clone(),
                    comment_count: thread.len(),
                    most_recent: thread.iter().map(|c| c.created_at).max(),
                })
                .collect::<Vec<_>>()
        });

        // Stable sort: equal counts keep their iteration order.
        rows.sort_by(|a, b| b.comment_count.cmp(&a.comment_count));
        rows.truncate(n);
        rows
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::limiter::SlidingWindowLimiter;

    fn open_store() -> DiscussionStore {
        DiscussionStore::new(SlidingWindowLimiter::new(Duration::from_secs(10), usize::MAX))
    }

    fn fill(store: &DiscussionStore, key: &str, count: usize) {
        for i in 0..count {
            store
                .add_comment(key, "9.9.9.9", "ana", &format!("comment {i}"), None)
                .unwrap();
        }
    }

    #[test]
    fn ranks_keys_by_comment_count_descending() {
        let store = open_store();
        fill(&store, "a:1", 5);
        fill(&store, "b:2", 50);
        fill(&store, "c:3", 1);

        let top = TrendingIndex::new(&store).top(10);
        let counts: Vec<usize> = top.iter().map(|t| t.comment_count).collect();
        assert_eq!(counts, vec![50, 5, 1]);
        assert_eq!(top[0].key, "b:2");
    }

    #[test]
    fn truncates_to_n() {
        let store = open_store();
        for i in 0..15 {
            fill(&store, &format!("work:{i}"), i + 1);
        }
        let top = TrendingIndex::new(&store).top(10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].comment_count, 15);
    }

    #[test]
    fn empty_store_yields_empty_ranking() {
        let store = open_store();
        assert!(TrendingIndex::new(&store).top(10).is_empty());
    }

    #[test]
    fn most_recent_tracks_the_newest_comment() {
        let store = open_store();
        fill(&store, "a:1", 3);
        let top = TrendingIndex::new(&store).top(1);
        let newest = store.list_comments("a:1")[0].created_at;
        assert_eq!(top[0].most_recent, Some(newest));
    }

    #[test]
    fn emptied_threads_rank_last_with_no_timestamp() {
        let store = open_store();
        let c = store.add_comment("a:1", "ip", "ana", "bye", None).unwrap();
        store.delete_comment("a:1", &c.id).unwrap();
        fill(&store, "b:2", 2);

        let top = TrendingIndex::new(&store).top(10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[1].key, "a:1");
        assert_eq!(top[1].comment_count, 0);
        assert_eq!(top[1].most_recent, None);

        // The wire key is still present, as null, not omitted.
        let row = serde_json::to_value(&top[1]).unwrap();
        assert!(row["mostRecentTimestamp"].is_null());
    }

    #[test]
    fn rows_serialize_with_contract_keys() {
        let store = open_store();
        fill(&store, "a:1", 1);

        let row = serde_json::to_value(&TrendingIndex::new(&store).top(1)[0]).unwrap();
        let obj = row.as_object().unwrap();
        assert!(obj.contains_key("key"));
        assert!(obj.contains_key("commentCount"));
        assert!(obj.contains_key("mostRecentTimestamp"));
        assert_eq!(obj.len(), 3);
        assert_eq!(row["commentCount"], 1);
        assert!(row["mostRecentTimestamp"].is_string());
    }
}
