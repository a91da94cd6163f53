//! Insertion-ordered hash index shared by [`KeySet`](super::KeySet) and
//! [`ValueMap`](super::ValueMap).
//!
//! Entries are kept in a slot vector in insertion order, and a hash index maps
//! every live key to its slot. Removing an entry leaves a tombstone behind so
//! that the positions of the remaining entries stay valid. Tombstones are
//! reclaimed by compaction once they outnumber the live entries.
//!
//! # Time Complexity
//!
//! | Operation  | Average        |
//! |------------|----------------|
//! | `insert`   | O(1)           |
//! | `remove`   | O(1) amortized |
//! | `get`      | O(1)           |
//! | `contains` | O(1)           |
//! | `len`      | O(1)           |
//! | `iter`     | O(n + t)       |
//!
//! where `t` is the number of tombstones, which is bounded by
//! `max(n, COMPACTION_FLOOR)`.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use super::HashState;

/// Tombstone count at or below which compaction is never attempted.
const COMPACTION_FLOOR: usize = 16;

/// Insertion-ordered storage of `(K, V)` entries with hashed lookup.
#[derive(Clone)]
pub(crate) struct InsertionIndex<K, V> {
    slots: Vec<Option<(K, V)>>,
    positions: HashMap<K, usize, HashState>,
}

impl<K: Clone + Eq + Hash, V> InsertionIndex<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            positions: HashMap::with_hasher(HashState::default()),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity_and_hasher(capacity, HashState::default()),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = *self.positions.get(key)?;
        self.slots
            .get(position)
            .and_then(Option::as_ref)
            .map(|(_, value)| value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = *self.positions.get(key)?;
        self.slots
            .get_mut(position)
            .and_then(Option::as_mut)
            .map(|(_, value)| value)
    }

    /// Inserts an entry, returning the previous value if the key was present.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&position) = self.positions.get(&key)
            && let Some((_, slot_value)) = self.slots.get_mut(position).and_then(Option::as_mut)
        {
            return Some(std::mem::replace(slot_value, value));
        }

        self.positions.insert(key.clone(), self.slots.len());
        self.slots.push(Some((key, value)));
        None
    }

    /// Removes an entry, returning it if the key was present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.positions.remove(key)?;
        let entry = self.slots.get_mut(position).and_then(Option::take);
        debug_assert!(entry.is_some(), "{}", DANGLING_POSITION_PANIC_MESSAGE);
        self.reclaim();
        entry
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.positions.clear();
    }

    /// Keeps only the entries for which `predicate` returns `true`.
    ///
    /// Surviving entries keep their relative order.
    pub(crate) fn retain<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let positions = &mut self.positions;
        for slot in &mut self.slots {
            let keep = match slot {
                Some((key, value)) => predicate(key, value),
                None => continue,
            };
            if !keep && let Some((key, _)) = slot.take() {
                positions.remove(&key);
            }
        }
        self.reclaim();
    }

    #[inline]
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len(),
        }
    }

    /// Number of tombstones currently held in the slot vector.
    #[cfg(test)]
    fn tombstones(&self) -> usize {
        self.slots.len() - self.positions.len()
    }

    /// Drops trailing tombstones and compacts when the slots become sparse.
    fn reclaim(&mut self) {
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }

        let tombstones = self.slots.len() - self.positions.len();
        if tombstones > COMPACTION_FLOOR && tombstones > self.positions.len() {
            self.compact();
        }
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (position, (key, _)) in self.slots.iter().flatten().enumerate() {
            if let Some(slot_position) = self.positions.get_mut(key) {
                *slot_position = position;
            }
        }
    }
}

impl<K, V> IntoIterator for InsertionIndex<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.positions.len(),
            slots: self.slots.into_iter(),
        }
    }
}

/// Message for a hash index entry that points at an empty slot.
const DANGLING_POSITION_PANIC_MESSAGE: &str = "hash index points at an empty slot";

/// Borrowing iterator over live entries in insertion order.
pub(crate) struct Iter<'a, K, V> {
    slots: std::slice::Iter<'a, Option<(K, V)>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some((key, value)) = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.slots.next_back() {
            if let Some((key, value)) = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

/// Owning iterator over live entries in insertion order.
pub(crate) struct IntoIter<K, V> {
    slots: std::vec::IntoIter<Option<(K, V)>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some(entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn index_of(keys: impl IntoIterator<Item = i32>) -> InsertionIndex<i32, i32> {
        let mut index = InsertionIndex::new();
        for key in keys {
            index.insert(key, key * 10);
        }
        index
    }

    fn keys_of(index: &InsertionIndex<i32, i32>) -> Vec<i32> {
        index.iter().map(|(key, _)| *key).collect()
    }

    #[rstest]
    fn test_compaction_floor_constant() {
        assert_eq!(COMPACTION_FLOOR, 16);
    }

    #[rstest]
    fn test_insert_keeps_insertion_order() {
        let index = index_of([3, 1, 2]);
        assert_eq!(keys_of(&index), vec![3, 1, 2]);
    }

    #[rstest]
    fn test_overwrite_keeps_position_and_returns_previous() {
        let mut index = index_of([1, 2, 3]);
        assert_eq!(index.insert(1, 100), Some(10));
        assert_eq!(keys_of(&index), vec![1, 2, 3]);
        assert_eq!(index.get(&1), Some(&100));
    }

    #[rstest]
    fn test_reinsert_after_remove_appends() {
        let mut index = index_of([1, 2, 3]);
        assert_eq!(index.remove(&1), Some((1, 10)));
        index.insert(1, 11);
        assert_eq!(keys_of(&index), vec![2, 3, 1]);
    }

    #[rstest]
    fn test_remove_missing_returns_none() {
        let mut index = index_of([1, 2]);
        assert_eq!(index.remove(&3), None);
        assert_eq!(index.len(), 2);
    }

    #[rstest]
    fn test_remove_last_trims_trailing_tombstones() {
        let mut index = index_of([1, 2, 3]);
        index.remove(&3);
        index.remove(&2);
        assert_eq!(index.tombstones(), 0);
        assert_eq!(keys_of(&index), vec![1]);
    }

    #[rstest]
    fn test_remove_middle_leaves_tombstone() {
        let mut index = index_of([1, 2, 3]);
        index.remove(&2);
        assert_eq!(index.tombstones(), 1);
        assert_eq!(index.iter().len(), 2);
        assert_eq!(keys_of(&index), vec![1, 3]);
    }

    #[rstest]
    fn test_compaction_preserves_order_and_lookups() {
        let mut index = index_of(0..100);
        for key in (0..99).filter(|key| key % 4 != 0) {
            index.remove(&key);
        }

        assert!(index.tombstones() <= COMPACTION_FLOOR.max(index.len()));
        let expected: Vec<i32> = (0..100).filter(|key| key % 4 == 0 || *key == 99).collect();
        assert_eq!(keys_of(&index), expected);
        for key in expected {
            assert_eq!(index.get(&key), Some(&(key * 10)));
        }
    }

    #[rstest]
    fn test_retain_removes_rejected_entries() {
        let mut index = index_of(1..=6);
        index.retain(|key, value| {
            *value += 1;
            key % 2 == 0
        });
        assert_eq!(keys_of(&index), vec![2, 4, 6]);
        assert_eq!(index.get(&2), Some(&21));
        assert!(!index.contains(&1));
    }

    #[rstest]
    fn test_iter_from_both_ends() {
        let mut index = index_of([1, 2, 3, 4]);
        index.remove(&2);
        let mut iter = index.iter();
        assert_eq!(iter.next_back().map(|(key, _)| *key), Some(4));
        assert_eq!(iter.next().map(|(key, _)| *key), Some(1));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next().map(|(key, _)| *key), Some(3));
        assert_eq!(iter.next(), None);
    }

    #[rstest]
    fn test_into_iter_skips_tombstones() {
        let mut index = index_of([1, 2, 3]);
        index.remove(&2);
        let entries: Vec<(i32, i32)> = index.into_iter().collect();
        assert_eq!(entries, vec![(1, 10), (3, 30)]);
    }

    #[rstest]
    fn test_borrowed_lookup() {
        let mut index: InsertionIndex<String, usize> = InsertionIndex::with_capacity(2);
        index.insert("apple".to_string(), 1);
        assert!(index.contains("apple"));
        assert_eq!(index.get("apple"), Some(&1));
        assert_eq!(index.remove("apple"), Some(("apple".to_string(), 1)));
        assert!(index.is_empty());
    }
}
