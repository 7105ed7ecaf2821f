//! Recency Index Module
//!
//! Tracks access order over cached keys for least-recently-used eviction.

use std::collections::{BTreeMap, HashMap};

// == Recency Index ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch stamps the key with a fresh, strictly increasing tick:
/// - Highest tick = Most recently used
/// - Lowest tick = Least recently used
///
/// Promote, remove and evict are O(log n).
#[derive(Debug, Default)]
pub struct RecencyIndex {
    /// Keys ordered by their last access tick
    order: BTreeMap<u64, i64>,
    /// Last access tick of each key
    ticks: HashMap<i64, u64>,
    /// Next tick to hand out
    clock: u64,
}

impl RecencyIndex {
    // == Constructor ==
    /// Creates a new empty recency index.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// An existing key is moved to the front; a new key is added there.
    pub fn touch(&mut self, key: i64) {
        let tick = self.clock;
        self.clock += 1;

        if let Some(previous) = self.ticks.insert(key, tick) {
            self.order.remove(&previous);
        }
        self.order.insert(tick, key);
    }

    // == Remove ==
    /// Removes a key from the index. Returns whether it was tracked.
    pub fn remove(&mut self, key: i64) -> bool {
        match self.ticks.remove(&key) {
            Some(tick) => {
                self.order.remove(&tick);
                true
            }
            None => false,
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the index is empty.
    pub fn evict_oldest(&mut self) -> Option<i64> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<i64> {
        self.order.first_key_value().map(|(_, key)| *key)
    }

    // == Most Recent First ==
    /// Iterates keys from most to least recently used.
    pub fn iter_most_recent(&self) -> impl Iterator<Item = i64> + '_ {
        self.order.values().rev().copied()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: i64) -> bool {
        self.ticks.contains_key(&key)
    }

    /// True when both internal views agree on the tracked key set.
    pub(crate) fn is_consistent(&self) -> bool {
        self.order.len() == self.ticks.len()
            && self
                .order
                .iter()
                .all(|(tick, key)| self.ticks.get(key) == Some(tick))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_new() {
        let index = RecencyIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.peek_oldest(), None);
    }

    #[test]
    fn test_touch_new_keys() {
        let mut index = RecencyIndex::new();

        index.touch(1);
        index.touch(2);
        index.touch(3);

        assert_eq!(index.len(), 3);
        assert_eq!(index.peek_oldest(), Some(1));
    }

    #[test]
    fn test_touch_existing_key_moves_to_front() {
        let mut index = RecencyIndex::new();

        index.touch(1);
        index.touch(2);
        index.touch(3);
        index.touch(1);

        assert_eq!(index.len(), 3);
        assert_eq!(index.peek_oldest(), Some(2));
        assert_eq!(index.iter_most_recent().collect::<Vec<_>>(), vec![1, 3, 2]);
    }

    #[test]
    fn test_evict_oldest_in_order() {
        let mut index = RecencyIndex::new();

        index.touch(10);
        index.touch(20);
        index.touch(30);

        assert_eq!(index.evict_oldest(), Some(10));
        assert_eq!(index.len(), 2);
        assert_eq!(index.evict_oldest(), Some(20));
        assert_eq!(index.evict_oldest(), Some(30));
        assert_eq!(index.evict_oldest(), None);
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut index = RecencyIndex::new();

        index.touch(1);
        index.touch(2);
        index.touch(3);

        assert!(index.remove(2));
        assert!(!index.contains(2));
        assert_eq!(index.iter_most_recent().collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn test_remove_nonexistent_key() {
        let mut index = RecencyIndex::new();

        index.touch(1);
        assert!(!index.remove(99));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_order_after_multiple_touches() {
        let mut index = RecencyIndex::new();

        index.touch(1);
        index.touch(2);
        index.touch(3);

        // front=[2, 3, 1]=back after these
        index.touch(1);
        index.touch(3);
        index.touch(2);

        assert_eq!(index.evict_oldest(), Some(1));
        assert_eq!(index.evict_oldest(), Some(3));
        assert_eq!(index.evict_oldest(), Some(2));
        assert!(index.is_consistent());
    }

    #[test]
    fn test_touch_same_key_multiple_times() {
        let mut index = RecencyIndex::new();

        index.touch(5);
        index.touch(5);
        index.touch(5);

        assert_eq!(index.len(), 1);
        assert!(index.is_consistent());
        assert_eq!(index.evict_oldest(), Some(5));
        assert!(index.is_empty());
    }
}
