//! The value map store of a [`HybridSetMap`](super::HybridSetMap).

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use super::slots::{self, InsertionIndex};

/// A hash map that iterates in insertion order.
///
/// Overwriting the value of a present key keeps the key's position.
///
/// # Examples
///
/// ```rust
/// use hybrid_set_map::hybrid::ValueMap;
///
/// let mut map = ValueMap::new();
/// map.insert("b", 2);
/// map.insert("a", 1);
/// assert_eq!(map.insert("b", 20), Some(2));
///
/// let entries: Vec<(&str, i32)> = map.iter().map(|(key, value)| (*key, *value)).collect();
/// assert_eq!(entries, vec![("b", 20), ("a", 1)]);
/// ```
#[derive(Clone)]
pub struct ValueMap<K, V> {
    index: InsertionIndex<K, V>,
}

impl<K: Clone + Eq + Hash, V> ValueMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: InsertionIndex::new(),
        }
    }

    /// Creates an empty map with room for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: InsertionIndex::with_capacity(capacity),
        }
    }

    /// Returns the number of entries in the map.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if the map has an entry for `key`.
    #[inline]
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains(key)
    }

    /// Returns a reference to the value stored for `key`.
    #[inline]
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key)
    }

    /// Returns a mutable reference to the value stored for `key`.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get_mut(key)
    }

    /// Stores `value` for `key`, returning the value it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.index.insert(key, value)
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.remove(key).map(|(_, value)| value)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.index.clear();
    }

    /// Keeps only the entries for which `predicate` returns `true`.
    pub fn retain<F>(&mut self, predicate: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.index.retain(predicate);
    }

    /// Returns an iterator over `(key, value)` pairs in insertion order.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> ValueMapIter<'_, K, V> {
        ValueMapIter {
            inner: self.index.iter(),
        }
    }

    /// Returns an iterator over the keys in insertion order.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> ValueMapKeys<'_, K, V> {
        ValueMapKeys {
            inner: self.index.iter(),
        }
    }

    /// Returns an iterator over the values in insertion order of their keys.
    #[inline]
    #[must_use]
    pub fn values(&self) -> ValueMapValues<'_, K, V> {
        ValueMapValues {
            inner: self.index.iter(),
        }
    }
}

impl<K: Clone + Eq + Hash, V> Default for ValueMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ValueMap<K, V>
where
    K: Clone + Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal when they hold the same entries, regardless of order.
impl<K: Clone + Eq + Hash, V: PartialEq> PartialEq for ValueMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Clone + Eq + Hash, V: Eq> Eq for ValueMap<K, V> {}

impl<K: Clone + Eq + Hash, V> FromIterator<(K, V)> for ValueMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Clone + Eq + Hash, V> Extend<(K, V)> for ValueMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Clone + Eq + Hash, V> IntoIterator for &'a ValueMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = ValueMapIter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for ValueMap<K, V> {
    type Item = (K, V);
    type IntoIter = ValueMapIntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        ValueMapIntoIter {
            inner: self.index.into_iter(),
        }
    }
}

/// Iterator over the entries of a [`ValueMap`].
pub struct ValueMapIter<'a, K, V> {
    inner: slots::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for ValueMapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValueMapIter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for ValueMapIter<'_, K, V> {}

/// Iterator over the keys of a [`ValueMap`].
pub struct ValueMapKeys<'a, K, V> {
    inner: slots::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for ValueMapKeys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValueMapKeys<'_, K, V> {}

/// Iterator over the values of a [`ValueMap`].
pub struct ValueMapValues<'a, K, V> {
    inner: slots::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for ValueMapValues<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValueMapValues<'_, K, V> {}

/// Owning iterator over the entries of a [`ValueMap`].
pub struct ValueMapIntoIter<K, V> {
    inner: slots::IntoIter<K, V>,
}

impl<K, V> Iterator for ValueMapIntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValueMapIntoIter<K, V> {}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for ValueMap<K, V>
where
    K: serde::Serialize + Clone + Eq + Hash,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

#[cfg(feature = "serde")]
struct ValueMapVisitor<K, V> {
    marker: std::marker::PhantomData<(K, V)>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for ValueMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Eq + Hash,
    V: serde::Deserialize<'de>,
{
    type Value = ValueMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let capacity = access.size_hint().unwrap_or(0).min(super::PREALLOCATION_LIMIT);
        let mut map = ValueMap::with_capacity(capacity);
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for ValueMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Eq + Hash,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(ValueMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_insert_returns_replaced_value() {
        let mut map = ValueMap::new();
        assert_eq!(map.insert("a", 1), None);
        assert_eq!(map.insert("a", 2), Some(1));
        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[rstest]
    fn test_overwrite_keeps_position() {
        let mut map: ValueMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        map.insert("a", 10);
        let keys: Vec<&str> = map.keys().copied().collect();
        assert_eq!(keys, vec!["a", "b"]);
        let values: Vec<i32> = map.values().copied().collect();
        assert_eq!(values, vec![10, 2]);
    }

    #[rstest]
    fn test_get_mut_updates_in_place() {
        let mut map: ValueMap<String, Vec<i32>> = ValueMap::new();
        map.insert("xs".to_string(), vec![1]);
        if let Some(values) = map.get_mut("xs") {
            values.push(2);
        }
        assert_eq!(map.get("xs"), Some(&vec![1, 2]));
    }

    #[rstest]
    fn test_remove_returns_value() {
        let mut map: ValueMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
        assert_eq!(map.remove(&1), Some("one"));
        assert_eq!(map.remove(&1), None);
        assert!(!map.contains_key(&1));
    }

    #[rstest]
    fn test_retain_filters_entries() {
        let mut map: ValueMap<i32, i32> = (1..=6).map(|key| (key, key * key)).collect();
        map.retain(|_, value| *value > 10);
        let entries: Vec<(i32, i32)> = map.into_iter().collect();
        assert_eq!(entries, vec![(4, 16), (5, 25), (6, 36)]);
    }

    #[rstest]
    fn test_equality_ignores_order() {
        let left: ValueMap<i32, i32> = [(1, 1), (2, 2)].into_iter().collect();
        let right: ValueMap<i32, i32> = [(2, 2), (1, 1)].into_iter().collect();
        let different: ValueMap<i32, i32> = [(1, 1), (2, 3)].into_iter().collect();
        assert_eq!(left, right);
        assert_ne!(left, different);
    }

    #[rstest]
    fn test_debug_uses_map_form() {
        let map: ValueMap<&str, i32> = [("a", 1)].into_iter().collect();
        assert_eq!(format!("{map:?}"), r#"{"a": 1}"#);
    }
}
