//! Checked positions into a flat container.
//!
//! A [`Position`] plays the role of an iterator into contiguous storage: it
//! names a slot by index. Because every structural mutation may shift or
//! reallocate the buffer, each position also carries the *stamp* of the
//! container state that produced it. Any mutation re-stamps the container, so
//! a position that outlived a mutation is recognised as stale instead of being
//! silently dereferenced at whatever element now occupies its index.
//!
//! Stamps come from a process-wide counter and every container draws its own
//! when it is created, so a position from one container is never accepted by
//! another.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh stamps.
static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

/// Provenance tag of a container state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Stamp(u64);

impl Stamp {
    /// Returns a stamp no other container state has observed.
    #[inline]
    pub(crate) fn fresh() -> Self {
        Self(NEXT_STAMP.fetch_add(1, Ordering::Relaxed))
    }
}

/// A position inside a flat container.
///
/// Positions range over `0..=len`, where `len` is the *end* position. They are
/// plain `Copy` values and never borrow the container; validity is checked
/// when a position is handed back to the container that produced it.
///
/// Positions from the same container state compare by index, so a position
/// returned by [`find`](crate::flat::FlatTree::find) can be compared with
/// [`begin`](crate::flat::FlatTree::begin) moved forward.
///
/// # Examples
///
/// ```rust
/// use lambars_flat::flat::FlatSet;
///
/// let set: FlatSet<i32> = [5, 1, 3].into_iter().collect();
/// let position = set.find(&3);
/// assert_eq!(position, set.begin().next());
/// assert_eq!(set.get_at(position), Some(&3));
/// assert_eq!(set.find(&4), set.end());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    index: usize,
    stamp: Stamp,
}

impl Position {
    #[inline]
    pub(crate) const fn new(index: usize, stamp: Stamp) -> Self {
        Self { index, stamp }
    }

    #[inline]
    pub(crate) const fn stamp(self) -> Stamp {
        self.stamp
    }

    /// Returns the element index this position names.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Returns the position one slot further.
    ///
    /// Moving past the end position is allowed; the container reports such a
    /// position as out of bounds when it is used.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        self.advance(1)
    }

    /// Returns the position one slot back, or `None` at the first slot.
    #[inline]
    #[must_use]
    pub const fn prev(self) -> Option<Self> {
        match self.index.checked_sub(1) {
            Some(index) => Some(Self::new(index, self.stamp)),
            None => None,
        }
    }

    /// Returns the position `count` slots further.
    #[inline]
    #[must_use]
    pub const fn advance(self, count: usize) -> Self {
        Self::new(self.index.saturating_add(count), self.stamp)
    }

    /// Returns `true` if both positions come from the same container state.
    #[inline]
    #[must_use]
    pub fn same_origin(self, other: Self) -> bool {
        self.stamp == other.stamp
    }

    /// Number of slots from `self` to `later`.
    ///
    /// Returns `None` if the positions have different origins or `later` is
    /// before `self`.
    #[inline]
    #[must_use]
    pub fn distance_to(self, later: Self) -> Option<usize> {
        if self.same_origin(later) {
            later.index.checked_sub(self.index)
        } else {
            None
        }
    }
}

impl PartialOrd for Position {
    /// Positions are ordered only when they share an origin.
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.same_origin(*other).then(|| self.index.cmp(&other.index))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Position")
            .field("index", &self.index)
            .field("stamp", &self.stamp.0)
            .finish()
    }
}
