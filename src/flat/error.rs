//! Error types for flat containers.
//!
//! Lookups never fail: an absent key is reported as the end position, a zero
//! count or `None`. Errors are reserved for caller mistakes with positions and
//! for allocation failures on the fallible `try_*` paths.

use std::collections::TryReserveError;

/// Errors reported by the checked operations of a flat container.
///
/// # Examples
///
/// ```rust
/// use lambars_flat::flat::{FlatSet, FlatTreeError};
///
/// let mut set: FlatSet<i32> = [1, 2, 3].into_iter().collect();
/// let stale = set.begin();
/// set.insert(0);
///
/// assert_eq!(set.try_erase(stale), Err(FlatTreeError::StalePosition { index: 0 }));
/// assert_eq!(
///     format!("{}", FlatTreeError::OutOfBounds { index: 5, length: 3 }),
///     "position 5 is out of bounds for a container of length 3"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatTreeError {
    /// The position was produced before the container was last mutated, or
    /// by a different container.
    StalePosition {
        /// Index the stale position named.
        index: usize,
    },
    /// The position does not name an element.
    OutOfBounds {
        /// Index the position named.
        index: usize,
        /// Number of elements in the container.
        length: usize,
    },
    /// The first position of a range lies after the last one.
    InvalidRange {
        /// Index of the first position.
        first: usize,
        /// Index of the last position.
        last: usize,
    },
    /// The allocator could not provide the requested capacity.
    Reserve(TryReserveError),
}

impl std::fmt::Display for FlatTreeError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StalePosition { index } => write!(
                formatter,
                "position {index} was invalidated by a mutation or belongs to another container"
            ),
            Self::OutOfBounds { index, length } => write!(
                formatter,
                "position {index} is out of bounds for a container of length {length}"
            ),
            Self::InvalidRange { first, last } => {
                write!(formatter, "range start {first} is after range end {last}")
            }
            Self::Reserve(error) => write!(formatter, "failed to reserve capacity: {error}"),
        }
    }
}

impl std::error::Error for FlatTreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Reserve(error) => Some(error),
            _ => None,
        }
    }
}

impl From<TryReserveError> for FlatTreeError {
    fn from(error: TryReserveError) -> Self {
        Self::Reserve(error)
    }
}
