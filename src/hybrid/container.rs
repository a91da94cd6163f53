//! [`HybridSetMap`]: a key set with an optional value map alongside it.
//!
//! # Time Complexity
//!
//! | Operation          | Average |
//! |--------------------|---------|
//! | `add`              | O(1)    |
//! | `get` / `has`      | O(1)    |
//! | `delete`           | O(1)*   |
//! | `delete_from_set`  | O(1)*   |
//! | `clear`            | O(n)    |
//! | `len`              | O(1)    |
//! | `keys` / `entries` | O(n)    |
//! | `purge_dangling`   | O(n)    |
//!
//! \* amortized

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use super::key_set::{KeySet, KeySetIntoIter, KeySetIter};
use super::value_map::{ValueMap, ValueMapIntoIter, ValueMapIter, ValueMapValues};

/// Whether a [`HybridSetMap`] stores values.
///
/// Chosen once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueMode {
    /// Keys may carry values; the container owns a value map.
    Values,
    /// Keys only; any value handed to the container is discarded.
    PureSet,
}

/// A set of keys that can optionally associate a value with each key.
///
/// The container owns two stores: a [`KeySet`] holding every key, and, in
/// [`ValueMode::Values`], a [`ValueMap`] holding the values of the keys that
/// have one. Both iterate in insertion order.
///
/// Set-style queries ([`has`](Self::has), [`keys`](Self::keys),
/// [`len`](Self::len)) read the key set. Map-style queries
/// ([`get`](Self::get), [`values`](Self::values), [`entries`](Self::entries),
/// [`for_each`](Self::for_each)) read the value map and see nothing in
/// [`ValueMode::PureSet`].
///
/// The container is not synchronized; share it across threads behind a lock.
///
/// # Examples
///
/// ```rust
/// use hybrid_set_map::hybrid::{HybridSetMap, ValueMode};
///
/// let mut container = HybridSetMap::from_pairs(ValueMode::Values, [("a", 1), ("b", 2)]);
/// container.add_key("c");
///
/// assert_eq!(container.len(), 3);
/// assert_eq!(container.get("a"), Some(&1));
/// assert_eq!(container.get("c"), None);
///
/// assert!(container.delete("a"));
/// assert!(!container.has("a"));
///
/// let keys: Vec<&str> = container.keys().copied().collect();
/// assert_eq!(keys, vec!["b", "c"]);
/// ```
#[derive(Clone)]
pub struct HybridSetMap<K, V> {
    key_set: KeySet<K>,
    value_map: Option<ValueMap<K, V>>,
}

impl<K: Clone + Eq + Hash, V> HybridSetMap<K, V> {
    /// Creates an empty container in the given mode.
    #[must_use]
    pub fn new(mode: ValueMode) -> Self {
        Self {
            key_set: KeySet::new(),
            value_map: match mode {
                ValueMode::Values => Some(ValueMap::new()),
                ValueMode::PureSet => None,
            },
        }
    }

    /// Creates an empty container that stores values.
    #[must_use]
    pub fn with_values() -> Self {
        Self::new(ValueMode::Values)
    }

    /// Creates an empty container that only tracks keys.
    #[must_use]
    pub fn pure_set() -> Self {
        Self::new(ValueMode::PureSet)
    }

    /// Creates a container seeded with `pairs`, in order.
    ///
    /// In [`ValueMode::PureSet`] only the keys are kept. A key repeated in
    /// `pairs` keeps its first position and its last value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hybrid_set_map::hybrid::{HybridSetMap, ValueMode};
    ///
    /// let container = HybridSetMap::from_pairs(ValueMode::Values, [(1, "a"), (2, "b"), (1, "c")]);
    /// assert_eq!(container.len(), 2);
    /// assert_eq!(container.get(&1), Some(&"c"));
    ///
    /// let keys_only = HybridSetMap::from_pairs(ValueMode::PureSet, [(1, "a"), (2, "b")]);
    /// assert_eq!(keys_only.len(), 2);
    /// assert_eq!(keys_only.get(&1), None);
    /// ```
    #[must_use]
    pub fn from_pairs<I>(mode: ValueMode, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut container = Self::new(mode);
        for (key, value) in pairs {
            container.add(key, Some(value));
        }
        container
    }

    /// Creates a pure-set container holding `keys`.
    #[must_use]
    pub fn pure_set_from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        Self {
            key_set: keys.into_iter().collect(),
            value_map: None,
        }
    }

    /// Returns the mode fixed at construction.
    #[inline]
    #[must_use]
    pub const fn value_mode(&self) -> ValueMode {
        if self.value_map.is_some() {
            ValueMode::Values
        } else {
            ValueMode::PureSet
        }
    }

    /// Adds `key`, and stores `value` for it when the container is in value
    /// mode and a value is given.
    ///
    /// Adding with `None` never removes a stored value. Returns the container
    /// so calls can be chained.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hybrid_set_map::hybrid::HybridSetMap;
    ///
    /// let mut container = HybridSetMap::with_values();
    /// container.add("x", Some(1)).add("y", None).add("x", None);
    ///
    /// assert_eq!(container.len(), 2);
    /// assert_eq!(container.get("x"), Some(&1));
    /// assert_eq!(container.get("y"), None);
    /// ```
    pub fn add(&mut self, key: K, value: Option<V>) -> &mut Self {
        if let (Some(value_map), Some(value)) = (self.value_map.as_mut(), value) {
            self.key_set.insert(key.clone());
            value_map.insert(key, value);
        } else {
            self.key_set.insert(key);
        }
        self
    }

    /// Adds `key` with `value`. Same as `add(key, Some(value))`.
    pub fn insert(&mut self, key: K, value: V) -> &mut Self {
        self.add(key, Some(value))
    }

    /// Adds `key` without a value. Same as `add(key, None)`.
    pub fn add_key(&mut self, key: K) -> &mut Self {
        self.add(key, None)
    }

    /// Returns the value stored for `key`.
    ///
    /// Only the value map is consulted; `None` is returned in pure-set mode
    /// and for keys added without a value.
    #[inline]
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.value_map.as_ref()?.get(key)
    }

    /// Returns a mutable reference to the value stored for `key`.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.value_map.as_mut()?.get_mut(key)
    }

    /// Returns `true` if `key` is in the key set.
    #[inline]
    #[must_use]
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.key_set.contains(key)
    }

    /// Same as [`has`](Self::has).
    #[inline]
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.has(key)
    }

    /// Removes `key` from both stores.
    ///
    /// Returns `true` if the key was in the key set, whether or not it carried
    /// a value.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let was_present = self.key_set.remove(key);
        if let Some(value_map) = self.value_map.as_mut() {
            value_map.remove(key);
        }
        was_present
    }

    /// Removes `key` from both stores, returning its value.
    pub fn take<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.key_set.remove(key);
        self.value_map.as_mut()?.remove(key)
    }

    /// Removes every key and value.
    pub fn clear(&mut self) {
        self.key_set.clear();
        if let Some(value_map) = self.value_map.as_mut() {
            value_map.clear();
        }
    }

    /// Removes `key` as a set member.
    ///
    /// Any value stored for `key` is discarded with it, so the value map never
    /// outlives its key. Returns `true` only for a clean set removal: the key
    /// was present and carried no value. A key that carried a value is still
    /// removed, but `false` is returned to signal that a value went with it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hybrid_set_map::hybrid::HybridSetMap;
    ///
    /// let mut container = HybridSetMap::with_values();
    /// container.add_key("bare").insert("valued", 1);
    ///
    /// assert!(container.delete_from_set("bare"));
    /// assert!(!container.delete_from_set("valued"));
    /// assert!(container.is_empty());
    /// assert_eq!(container.get("valued"), None);
    /// ```
    pub fn delete_from_set<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let was_present = self.key_set.remove(key);
        let had_value = self
            .value_map
            .as_mut()
            .and_then(|value_map| value_map.remove(key))
            .is_some();
        was_present && !had_value
    }

    /// Empties the key set, and with it the value map.
    ///
    /// Values cannot outlive their keys, so this is the same as
    /// [`clear`](Self::clear).
    pub fn clear_set(&mut self) {
        self.clear();
    }

    /// Keeps only the keys for which `predicate` returns `true`.
    ///
    /// The predicate sees each key of the key set with its value, if any.
    /// Values of rejected keys are dropped.
    pub fn retain<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&K, Option<&V>) -> bool,
    {
        let value_map = &mut self.value_map;
        self.key_set.retain(|key| {
            let keep = predicate(key, value_map.as_ref().and_then(|map| map.get(key)));
            if !keep && let Some(map) = value_map.as_mut() {
                map.remove(key);
            }
            keep
        });
    }

    /// Returns an iterator over the keys of the key set, in insertion order.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K> {
        Keys {
            inner: self.key_set.iter(),
        }
    }

    /// Returns an iterator over the stored values.
    ///
    /// Empty in pure-set mode.
    #[inline]
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.value_map.as_ref().map(ValueMap::values),
        }
    }

    /// Returns an iterator over `(key, value)` pairs of the value map.
    ///
    /// Keys without a value are not yielded. Empty in pure-set mode.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries {
            inner: self.value_map.as_ref().map(ValueMap::iter),
        }
    }

    /// Same as [`entries`](Self::entries).
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Entries<'_, K, V> {
        self.entries()
    }

    /// Calls `callback(value, key, value_map)` for every entry of the value map.
    ///
    /// Does nothing in pure-set mode.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hybrid_set_map::hybrid::HybridSetMap;
    ///
    /// let container: HybridSetMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    /// let mut total = 0;
    /// container.for_each(|value, _key, map| {
    ///     assert_eq!(map.len(), 2);
    ///     total += value;
    /// });
    /// assert_eq!(total, 3);
    /// ```
    pub fn for_each<F>(&self, mut callback: F)
    where
        F: FnMut(&V, &K, &ValueMap<K, V>),
    {
        if let Some(value_map) = &self.value_map {
            for (key, value) in value_map {
                callback(value, key, value_map);
            }
        }
    }

    /// Calls `callback(key, key, key_set)` for every key of the key set.
    ///
    /// Runs in both modes.
    pub fn for_each_in_set<F>(&self, mut callback: F)
    where
        F: FnMut(&K, &K, &KeySet<K>),
    {
        for key in &self.key_set {
            callback(key, key, &self.key_set);
        }
    }

    /// Returns the number of keys in the key set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.key_set.len()
    }

    /// Returns `true` if the key set is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_set.is_empty()
    }

    /// Returns the key set.
    #[inline]
    #[must_use]
    pub const fn key_set(&self) -> &KeySet<K> {
        &self.key_set
    }

    /// Returns the value map, or `None` in pure-set mode.
    #[inline]
    #[must_use]
    pub const fn value_map(&self) -> Option<&ValueMap<K, V>> {
        self.value_map.as_ref()
    }

    /// Returns the live key set for direct mutation.
    ///
    /// Changes made through this reference bypass the container: removing a
    /// key here leaves its value behind in the value map. Use
    /// [`purge_dangling`](Self::purge_dangling) to drop such values.
    #[inline]
    pub const fn get_set(&mut self) -> &mut KeySet<K> {
        &mut self.key_set
    }

    /// Returns the live value map for direct mutation, or `None` in pure-set
    /// mode.
    ///
    /// Changes made through this reference bypass the container: a key
    /// inserted here is not added to the key set.
    #[inline]
    pub const fn get_map(&mut self) -> Option<&mut ValueMap<K, V>> {
        self.value_map.as_mut()
    }

    /// Returns `true` if every key of the value map is in the key set.
    ///
    /// Always `true` unless a store was edited through
    /// [`get_set`](Self::get_set) or [`get_map`](Self::get_map).
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.value_map
            .as_ref()
            .is_none_or(|value_map| value_map.keys().all(|key| self.key_set.contains(key)))
    }

    /// Drops every value whose key is not in the key set, returning how many
    /// were dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hybrid_set_map::hybrid::HybridSetMap;
    ///
    /// let mut container: HybridSetMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    /// container.get_set().remove("a");
    /// assert!(!container.is_consistent());
    ///
    /// assert_eq!(container.purge_dangling(), 1);
    /// assert!(container.is_consistent());
    /// assert_eq!(container.values().count(), 1);
    /// ```
    pub fn purge_dangling(&mut self) -> usize {
        let Some(value_map) = self.value_map.as_mut() else {
            return 0;
        };
        let before = value_map.len();
        let key_set = &self.key_set;
        value_map.retain(|key, _| key_set.contains(key));
        before - value_map.len()
    }

    /// Consumes the container, returning its keys in insertion order.
    #[must_use]
    pub fn into_keys(self) -> KeySetIntoIter<K> {
        self.key_set.into_iter()
    }
}

/// An empty container in value mode.
impl<K: Clone + Eq + Hash, V> Default for HybridSetMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::with_values()
    }
}

impl<K, V> fmt::Debug for HybridSetMap<K, V>
where
    K: Clone + Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HybridSetMap")
            .field("mode", &self.value_mode())
            .field("keys", &self.key_set)
            .field("values", &self.value_map)
            .finish()
    }
}

/// Equal when both containers share a mode, a key set and a value map.
/// Insertion order is not compared.
impl<K: Clone + Eq + Hash, V: PartialEq> PartialEq for HybridSetMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key_set == other.key_set && self.value_map == other.value_map
    }
}

impl<K: Clone + Eq + Hash, V: Eq> Eq for HybridSetMap<K, V> {}

/// Collects into a container in value mode.
impl<K: Clone + Eq + Hash, V> FromIterator<(K, V)> for HybridSetMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(ValueMode::Values, iter)
    }
}

impl<K: Clone + Eq + Hash, V> Extend<(K, V)> for HybridSetMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, Some(value));
        }
    }
}

impl<'a, K: Clone + Eq + Hash, V> IntoIterator for &'a HybridSetMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Entries<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

/// Yields the entries of the value map; keys without a value are dropped.
impl<K, V> IntoIterator for HybridSetMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoEntries<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoEntries {
            inner: self.value_map.map(IntoIterator::into_iter),
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over the keys of a [`HybridSetMap`].
#[derive(Clone)]
pub struct Keys<'a, K> {
    inner: KeySetIter<'a, K>,
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Keys<'_, K> {}

/// Iterator over the values of a [`HybridSetMap`].
pub struct Values<'a, K, V> {
    inner: Option<ValueMapValues<'a, K, V>>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner
            .as_ref()
            .map_or((0, Some(0)), Iterator::size_hint)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Iterator over the entries of a [`HybridSetMap`].
pub struct Entries<'a, K, V> {
    inner: Option<ValueMapIter<'a, K, V>>,
}

impl<'a, K, V> Iterator for Entries<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner
            .as_ref()
            .map_or((0, Some(0)), Iterator::size_hint)
    }
}

impl<K, V> DoubleEndedIterator for Entries<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next_back()
    }
}

impl<K, V> ExactSizeIterator for Entries<'_, K, V> {}

/// Owning iterator over the entries of a [`HybridSetMap`].
pub struct IntoEntries<K, V> {
    inner: Option<ValueMapIntoIter<K, V>>,
}

impl<K, V> Iterator for IntoEntries<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner
            .as_ref()
            .map_or((0, Some(0)), Iterator::size_hint)
    }
}

impl<K, V> ExactSizeIterator for IntoEntries<K, V> {}

static_assertions::assert_impl_all!(HybridSetMap<String, i32>: Send, Sync, Clone, Default);
static_assertions::assert_impl_all!(KeySet<String>: Send, Sync, Clone, Default);
static_assertions::assert_not_impl_any!(HybridSetMap<std::rc::Rc<i32>, i32>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for HybridSetMap<K, V>
where
    K: serde::Serialize + Clone + Eq + Hash,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("HybridSetMap", 2)?;
        state.serialize_field("keys", &self.key_set)?;
        state.serialize_field("values", &self.value_map)?;
        state.end()
    }
}

/// Wire form of a [`HybridSetMap`]; `values: None` is pure-set mode.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(bound(deserialize = "K: serde::Deserialize<'de> + Clone + Eq + Hash, \
                             V: serde::Deserialize<'de>"))]
struct HybridSetMapRepr<K, V> {
    keys: KeySet<K>,
    values: Option<ValueMap<K, V>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for HybridSetMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Eq + Hash,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let HybridSetMapRepr { keys, values } =
            <HybridSetMapRepr<K, V> as serde::Deserialize>::deserialize(deserializer)?;
        let container = Self {
            key_set: keys,
            value_map: values,
        };
        if container.is_consistent() {
            Ok(container)
        } else {
            Err(serde::de::Error::custom(DANGLING_VALUE_ERROR_MESSAGE))
        }
    }
}

#[cfg(feature = "serde")]
const DANGLING_VALUE_ERROR_MESSAGE: &str = "value entry for a key missing from the key set";

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valued() -> HybridSetMap<&'static str, i32> {
        let mut container = HybridSetMap::with_values();
        container.insert("a", 1).add_key("b").insert("c", 3);
        container
    }

    #[rstest]
    #[case::values(ValueMode::Values, true)]
    #[case::pure_set(ValueMode::PureSet, false)]
    fn test_value_map_exists_only_in_value_mode(#[case] mode: ValueMode, #[case] expected: bool) {
        let mut container: HybridSetMap<i32, i32> = HybridSetMap::new(mode);
        assert_eq!(container.value_mode(), mode);
        assert_eq!(container.value_map().is_some(), expected);
        assert_eq!(container.get_map().is_some(), expected);
    }

    #[rstest]
    fn test_mode_survives_clear() {
        let mut container = valued();
        container.clear();
        assert_eq!(container.value_mode(), ValueMode::Values);
        assert!(container.value_map().is_some());
    }

    #[rstest]
    fn test_add_none_keeps_existing_value() {
        let mut container = valued();
        container.add("a", None);
        assert_eq!(container.get("a"), Some(&1));
    }

    #[rstest]
    fn test_delete_returns_true_for_key_without_value() {
        let mut container = valued();
        assert!(container.delete("b"));
        assert!(!container.delete("b"));
        assert_eq!(container.len(), 2);
    }

    #[rstest]
    fn test_delete_from_set_purges_value() {
        let mut container = valued();
        assert!(!container.delete_from_set("a"));
        assert!(!container.has("a"));
        assert_eq!(container.get("a"), None);
        assert!(container.is_consistent());
    }

    #[rstest]
    fn test_delete_from_set_missing_key() {
        let mut container = valued();
        assert!(!container.delete_from_set("zzz"));
        assert_eq!(container.len(), 3);
    }

    #[rstest]
    fn test_delete_from_set_in_pure_set_mode() {
        let mut container = HybridSetMap::<i32, ()>::pure_set_from_keys([1, 2]);
        assert!(container.delete_from_set(&1));
        assert_eq!(container.len(), 1);
    }

    #[rstest]
    fn test_clear_set_clears_values_too() {
        let mut container = valued();
        container.clear_set();
        assert!(container.is_empty());
        assert_eq!(container.values().count(), 0);
    }

    #[rstest]
    fn test_take_returns_value_and_removes_key() {
        let mut container = valued();
        assert_eq!(container.take("c"), Some(3));
        assert_eq!(container.take("b"), None);
        assert_eq!(container.len(), 1);
    }

    #[rstest]
    fn test_retain_sees_optional_values() {
        let mut container = valued();
        container.retain(|_, value| value.is_some_and(|value| *value > 1));
        let keys: Vec<&str> = container.keys().copied().collect();
        assert_eq!(keys, vec!["c"]);
        assert_eq!(container.value_map().map(ValueMap::len), Some(1));
    }

    #[rstest]
    fn test_get_mut_changes_value() {
        let mut container = valued();
        if let Some(value) = container.get_mut("a") {
            *value = 100;
        }
        assert_eq!(container.get("a"), Some(&100));
    }

    #[rstest]
    fn test_for_each_skips_pure_set() {
        let container = HybridSetMap::from_pairs(ValueMode::PureSet, [(1, 1), (2, 2)]);
        let mut calls = 0;
        container.for_each(|_, _, _| calls += 1);
        assert_eq!(calls, 0);

        let mut keys = Vec::new();
        container.for_each_in_set(|value, key, set| {
            assert_eq!(value, key);
            assert_eq!(set.len(), 2);
            keys.push(*key);
        });
        assert_eq!(keys, vec![1, 2]);
    }

    #[rstest]
    fn test_get_map_insert_is_detected_as_dangling() {
        let mut container = valued();
        if let Some(map) = container.get_map() {
            map.insert("ghost", 9);
        }
        assert!(!container.is_consistent());
        assert!(!container.has("ghost"));
        assert_eq!(container.get("ghost"), Some(&9));
        assert_eq!(container.purge_dangling(), 1);
        assert!(container.is_consistent());
    }

    #[rstest]
    fn test_purge_dangling_in_pure_set_mode() {
        let mut container: HybridSetMap<i32, i32> = HybridSetMap::pure_set();
        assert_eq!(container.purge_dangling(), 0);
    }

    #[rstest]
    fn test_equality_depends_on_mode() {
        let keys_only: HybridSetMap<i32, i32> = HybridSetMap::pure_set_from_keys([1]);
        let mut keyed = HybridSetMap::with_values();
        keyed.add_key(1);
        assert_ne!(keys_only, keyed);
    }

    #[rstest]
    fn test_debug_output() {
        let mut container = HybridSetMap::with_values();
        container.insert(1, "one").add_key(2);
        assert_eq!(
            format!("{container:?}"),
            r#"HybridSetMap { mode: Values, keys: {1, 2}, values: Some({1: "one"}) }"#
        );
    }

    #[rstest]
    fn test_into_iter_yields_valued_entries() {
        let entries: Vec<(&str, i32)> = valued().into_iter().collect();
        assert_eq!(entries, vec![("a", 1), ("c", 3)]);
        let keys: Vec<&str> = valued().into_keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
