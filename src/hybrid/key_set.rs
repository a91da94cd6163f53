//! The key set store of a [`HybridSetMap`](super::HybridSetMap).
//!
//! [`KeySet`] is a mutable hash set that iterates in insertion order. It is
//! the store [`HybridSetMap::get_set`](super::HybridSetMap::get_set) hands
//! out, so it carries a complete set API of its own.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use super::slots::{self, InsertionIndex};

/// A hash set that remembers insertion order.
///
/// Re-inserting a present key leaves its position unchanged. A key inserted
/// again after removal moves to the end.
///
/// # Examples
///
/// ```rust
/// use hybrid_set_map::hybrid::KeySet;
///
/// let mut set = KeySet::new();
/// assert!(set.insert("b"));
/// assert!(set.insert("a"));
/// assert!(!set.insert("b"));
///
/// let keys: Vec<&str> = set.iter().copied().collect();
/// assert_eq!(keys, vec!["b", "a"]);
/// ```
#[derive(Clone)]
pub struct KeySet<K> {
    index: InsertionIndex<K, ()>,
}

impl<K: Clone + Eq + Hash> KeySet<K> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: InsertionIndex::new(),
        }
    }

    /// Creates an empty set with room for at least `capacity` keys.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: InsertionIndex::with_capacity(capacity),
        }
    }

    /// Returns the number of keys in the set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the set holds no keys.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if the set contains `key`.
    ///
    /// Borrowed forms of the key are accepted, so a `KeySet<String>` can be
    /// queried with a `&str`.
    #[inline]
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains(key)
    }

    /// Adds a key, returning `true` if it was not already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.index.insert(key, ()).is_none()
    }

    /// Removes a key, returning `true` if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.remove(key).is_some()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.index.clear();
    }

    /// Keeps only the keys for which `predicate` returns `true`.
    pub fn retain<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.index.retain(|key, ()| predicate(key));
    }

    /// Returns an iterator over the keys in insertion order.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> KeySetIter<'_, K> {
        KeySetIter {
            inner: self.index.iter(),
        }
    }
}

impl<K: Clone + Eq + Hash> Default for KeySet<K> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash + fmt::Debug> fmt::Debug for KeySet<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

/// Two sets are equal when they hold the same keys, regardless of order.
impl<K: Clone + Eq + Hash> PartialEq for KeySet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|key| other.contains(key))
    }
}

impl<K: Clone + Eq + Hash> Eq for KeySet<K> {}

impl<K: Clone + Eq + Hash> FromIterator<K> for KeySet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: Clone + Eq + Hash> Extend<K> for KeySet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: Clone + Eq + Hash> IntoIterator for &'a KeySet<K> {
    type Item = &'a K;
    type IntoIter = KeySetIter<'a, K>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> IntoIterator for KeySet<K> {
    type Item = K;
    type IntoIter = KeySetIntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        KeySetIntoIter {
            inner: self.index.into_iter(),
        }
    }
}

/// Iterator over references to the keys of a [`KeySet`], in insertion order.
#[derive(Clone)]
pub struct KeySetIter<'a, K> {
    inner: slots::Iter<'a, K, ()>,
}

impl<'a, K> Iterator for KeySetIter<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, ())| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for KeySetIter<'_, K> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, ())| key)
    }
}

impl<K> ExactSizeIterator for KeySetIter<'_, K> {}

/// Owning iterator over the keys of a [`KeySet`], in insertion order.
pub struct KeySetIntoIter<K> {
    inner: slots::IntoIter<K, ()>,
}

impl<K> Iterator for KeySetIntoIter<K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, ())| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for KeySetIntoIter<K> {}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize + Clone + Eq + Hash> serde::Serialize for KeySet<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for key in self {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct KeySetVisitor<K> {
    marker: std::marker::PhantomData<K>,
}

#[cfg(feature = "serde")]
impl<'de, K> serde::de::Visitor<'de> for KeySetVisitor<K>
where
    K: serde::Deserialize<'de> + Clone + Eq + Hash,
{
    type Value = KeySet<K>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of keys")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let capacity = seq.size_hint().unwrap_or(0).min(super::PREALLOCATION_LIMIT);
        let mut set = KeySet::with_capacity(capacity);
        while let Some(key) = seq.next_element()? {
            set.insert(key);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, K> serde::Deserialize<'de> for KeySet<K>
where
    K: serde::Deserialize<'de> + Clone + Eq + Hash,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(KeySetVisitor {
            marker: std::marker::PhantomData,
        })
    }
}
