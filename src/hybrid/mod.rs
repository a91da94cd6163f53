//! A set of keys that can optionally carry a value for each key.
//!
//! This module provides [`HybridSetMap`], a mutable container that combines
//! set-membership semantics with an optional key-value association, so callers
//! do not have to keep a set and a map in sync by hand.
//!
//! - [`HybridSetMap`]: the container
//! - [`KeySet`]: its insertion-ordered key set store
//! - [`ValueMap`]: its insertion-ordered value map store
//! - [`ValueMode`]: whether a container stores values at all
//!
//! # Value Mode
//!
//! Whether a container stores values is decided once, at construction, and
//! never changes afterwards:
//!
//! - [`ValueMode::Values`]: keys may carry values; the value map exists
//! - [`ValueMode::PureSet`]: keys only; values passed in are discarded
//!
//! # Examples
//!
//! ## Value mode
//!
//! ```rust
//! use hybrid_set_map::hybrid::HybridSetMap;
//!
//! let mut tags = HybridSetMap::with_values();
//! tags.insert("rust", 10).add_key("go");
//!
//! assert!(tags.has("go"));
//! assert_eq!(tags.get("rust"), Some(&10));
//! assert_eq!(tags.get("go"), None);
//! assert_eq!(tags.len(), 2);
//!
//! // Entries come from the value map: keys without a value are skipped
//! let entries: Vec<(&&str, &i32)> = tags.entries().collect();
//! assert_eq!(entries, vec![(&"rust", &10)]);
//! ```
//!
//! ## Pure-set mode
//!
//! ```rust
//! use hybrid_set_map::hybrid::HybridSetMap;
//!
//! let mut seen: HybridSetMap<u32, String> = HybridSetMap::pure_set();
//! seen.insert(7, "ignored".to_string());
//!
//! assert!(seen.has(&7));
//! assert_eq!(seen.get(&7), None);
//! assert_eq!(seen.entries().count(), 0);
//! ```
//!
//! # Invariants
//!
//! Through its own operations a container always keeps:
//!
//! 1. the value map present if and only if the container is in value mode,
//! 2. every key of the value map present in the key set,
//! 3. `len()` equal to the number of keys in the key set.
//!
//! A key may sit in the key set without a value. [`HybridSetMap::get_set`] and
//! [`HybridSetMap::get_map`] hand out the live stores and bypass (2); see
//! [`HybridSetMap::is_consistent`] and [`HybridSetMap::purge_dangling`].

// =============================================================================
// Hasher Selection
// =============================================================================

/// Hash builder used by both stores.
///
/// With the `fxhash` feature this is `rustc_hash::FxBuildHasher`; with the
/// `ahash` feature (and `fxhash` off) it is `ahash::RandomState`. Otherwise it
/// is the standard library's `RandomState`.
#[cfg(feature = "fxhash")]
pub(crate) type HashState = rustc_hash::FxBuildHasher;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub(crate) type HashState = ahash::RandomState;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub(crate) type HashState = std::collections::hash_map::RandomState;

/// Upper bound on capacity reserved from a deserializer's size hint.
#[cfg(feature = "serde")]
const PREALLOCATION_LIMIT: usize = 4096;

mod container;
mod key_set;
mod slots;
mod value_map;

pub use container::Entries;
pub use container::HybridSetMap;
pub use container::IntoEntries;
pub use container::Keys;
pub use container::ValueMode;
pub use container::Values;
pub use key_set::KeySet;
pub use key_set::KeySetIntoIter;
pub use key_set::KeySetIter;
pub use value_map::ValueMap;
pub use value_map::ValueMapIntoIter;
pub use value_map::ValueMapIter;
pub use value_map::ValueMapKeys;
pub use value_map::ValueMapValues;

#[cfg(test)]
mod hash_state_tests {
    use super::HashState;
    use rstest::rstest;
    use std::hash::BuildHasher;

    #[rstest]
    fn test_hash_state_is_deterministic_per_instance() {
        let state = HashState::default();
        assert_eq!(state.hash_one("key"), state.hash_one("key"));
    }

    #[rstest]
    fn test_hash_state_clone_hashes_alike() {
        let state = HashState::default();
        let cloned = state.clone();
        assert_eq!(state.hash_one(42_u64), cloned.hash_one(42_u64));
    }
}
