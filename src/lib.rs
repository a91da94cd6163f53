//! # hybrid-set-map
//!
//! An insertion-ordered set that can optionally carry a value for each key.
//!
//! ## Overview
//!
//! Code that needs both "is this key known?" and "what is attached to this
//! key?" usually ends up maintaining a set and a map side by side.
//! [`HybridSetMap`](hybrid::HybridSetMap) owns both stores and keeps them
//! consistent:
//!
//! - **Key set**: every key, whether or not it carries a value
//! - **Value map**: values for the keys that have one, present only in value mode
//! - **Value mode**: fixed at construction; a pure-set container never stores values
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for all containers
//! - `fxhash`: hash keys with `rustc_hash::FxBuildHasher`
//! - `ahash`: hash keys with `ahash::RandomState`
//! - `full`: Enable all optional integrations
//!
//! ## Example
//!
//! ```rust
//! use hybrid_set_map::prelude::*;
//!
//! let mut container = HybridSetMap::with_values();
//! container.insert("alpha", 1).add_key("beta");
//!
//! assert_eq!(container.len(), 2);
//! assert!(container.has("beta"));
//! assert_eq!(container.get("alpha"), Some(&1));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use hybrid_set_map::prelude::*;
/// ```
pub mod prelude {
    pub use crate::hybrid::{HybridSetMap, KeySet, ValueMap, ValueMode};
}

pub mod hybrid;
