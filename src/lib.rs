//! # lambars-flat
//!
//! Sorted, duplicate-free containers stored in contiguous memory.
//!
//! ## Overview
//!
//! Node-based ordered containers pay one allocation per element and chase
//! pointers on every lookup. This library keeps elements in a single sorted
//! buffer instead and offers the same ordered-container contract:
//!
//! - **Strict weak ordering**: lookups driven by an injected, possibly
//!   stateful comparator; keys are unique under its equivalence
//! - **Stable collisions**: an equivalent key never overwrites the stored
//!   element, and bulk construction keeps the first occurrence
//! - **Positions and hints**: checked positions, hinted insertion and range
//!   erasure
//! - **Capacity control**: `reserve`, `try_reserve` and `shrink_to_fit`
//!   decoupled from the logical size
//!
//! ## Feature Flags
//!
//! - `map`: `FlatMap` key/value container (default)
//! - `macros`: `flat_set!` and `flat_map!` (default)
//! - `serde`: `Serialize` / `Deserialize` implementations
//! - `rayon`: parallel read-only iteration
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use lambars_flat::prelude::*;
//!
//! let mut set: FlatSet<i32> = [5, 1, 4, 1].into_iter().collect();
//! assert_eq!(set.as_slice(), &[1, 4, 5]);
//!
//! let (position, inserted) = set.insert(3);
//! assert!(inserted);
//! assert_eq!(set.get_at(position), Some(&3));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use lambars_flat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::flat::{
        Compare, CompareFn, First, FlatSet, FlatTree, FlatTreeError, Greater, Identity, KeyOf,
        Less, Position,
    };

    #[cfg(feature = "map")]
    pub use crate::flat::FlatMap;
}

pub mod flat;
