//! Ordered containers over contiguous storage.
//!
//! This module provides sorted, duplicate-free containers that keep their
//! elements in a single `Vec` instead of a node-based tree:
//!
//! - [`FlatTree`]: the generic engine, parameterised by a key extractor and a
//!   comparator
//! - [`FlatSet`]: a [`FlatTree`] whose elements are their own keys
//! - [`FlatMap`]: a key/value map built on [`FlatTree`] (feature `map`)
//!
//! Lookups are binary searches. Insertions and removals shift the tail of the
//! buffer, which is cheap for small and medium containers thanks to cache
//! locality and the absence of per-node allocations.
//!
//! # Positions
//!
//! Iterator-style positions are represented by [`Position`], a `Copy` value
//! that carries the identity of the container state it was taken from.
//! Mutating the container invalidates every outstanding position, and the
//! container detects and rejects stale ones.
//!
//! # Examples
//!
//! ```rust
//! use lambars_flat::flat::{FlatSet, Greater};
//!
//! let mut ascending: FlatSet<i32> = [2, 3, 1].into_iter().collect();
//! let descending: FlatSet<i32, Greater> = [2, 3, 1].into_iter().collect();
//!
//! assert_eq!(ascending.as_slice(), &[1, 2, 3]);
//! assert_eq!(descending.as_slice(), &[3, 2, 1]);
//!
//! let position = ascending.lower_bound(&2);
//! let after = ascending.erase(position);
//! assert_eq!(ascending.get_at(after), Some(&3));
//! ```

mod algorithm;
mod compare;
mod error;
mod key;
#[cfg(feature = "macros")]
mod macros;
#[cfg(feature = "map")]
mod map;
mod position;
mod search;
mod storage;
mod tree;

pub use algorithm::{difference, erase_if, intersection, union};
pub use compare::{Compare, CompareFn, Greater, Less, ValueCompare};
pub use error::FlatTreeError;
pub use key::{First, Identity, KeyOf};
#[cfg(feature = "map")]
pub use map::{
    FlatMap, FlatMapIterMut, FlatMapIterator, FlatMapKeys, FlatMapValues, FlatMapValuesMut,
};
pub use position::Position;
pub use tree::{FlatTree, FlatTreeIntoIterator, FlatTreeIterator};

/// A sorted set: a [`FlatTree`] whose elements are their own keys.
///
/// # Examples
///
/// ```rust
/// use lambars_flat::flat::FlatSet;
///
/// let mut set = FlatSet::new();
/// assert!(set.insert("b").1);
/// assert!(set.insert("a").1);
/// assert!(!set.insert("b").1);
/// assert_eq!(set.as_slice(), &["a", "b"]);
/// ```
pub type FlatSet<T, C = Less> = FlatTree<T, Identity, C>;
