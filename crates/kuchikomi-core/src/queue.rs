//! Capacity-bounded queue with a configurable insertion end.
//!
//! A [`BoundedQueue`] holds at most `capacity` items. Inserting into a full
//! queue displaces the element at the opposite end rather than rejecting the
//! insert. The two end configurations exist because the two consumers present
//! items in opposite orders:
//!
//! - comment threads insert at the **front** (newest-first display) and evict
//!   at the back,
//! - reply lists insert at the **back** (chronological display) and evict at
//!   the front.
//!
//! Either way the element displaced is the one that was inserted longest ago,
//! so both configurations enforce the same logical policy: evict the oldest.

use std::collections::VecDeque;

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Which physical end of the queue new items are inserted at.
///
/// Eviction, when the queue is full, always happens at the opposite end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertEnd {
    /// New items go to the front; the back holds the oldest item.
    Front,
    /// New items go to the back; the front holds the oldest item.
    Back,
}

/// A fixed-capacity ordered collection that discards the oldest element on
/// overflow.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
    insert_end: InsertEnd,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue. `capacity` must be non-zero.
    pub fn new(capacity: usize, insert_end: InsertEnd) -> Self {
        assert!(capacity > 0, "BoundedQueue capacity must be non-zero");
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            insert_end,
        }
    }

    /// Insert an item, displacing the element at the evict end if the queue
    /// is full. Returns the displaced element, if any.
    pub fn insert(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            match self.insert_end {
                InsertEnd::Front => self.items.pop_back(),
                InsertEnd::Back => self.items.pop_front(),
            }
        } else {
            None
        };

        match self.insert_end {
            InsertEnd::Front => self.items.push_front(item),
            InsertEnd::Back => self.items.push_back(item),
        }

        evicted
    }

    /// Number of items currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of items the queue will hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over items in storage order (front to back).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Find the first item matching `pred`, in storage order.
    pub fn find<P: FnMut(&T) -> bool>(&self, mut pred: P) -> Option<&T> {
        self.items.iter().find(|&item| pred(item))
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut<P: FnMut(&T) -> bool>(&mut self, mut pred: P) -> Option<&mut T> {
        self.items.iter_mut().find(|item| pred(&**item))
    }

    /// Remove and return the first item matching `pred`, independent of the
    /// eviction policy.
    pub fn remove_where<P: FnMut(&T) -> bool>(&mut self, pred: P) -> Option<T> {
        let idx = self.items.iter().position(pred)?;
        self.items.remove(idx)
    }
}

/// Serializes as a plain JSON array in storage order.
impl<T: Serialize> Serialize for BoundedQueue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}
