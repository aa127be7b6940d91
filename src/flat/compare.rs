//! Strict weak orderings used to position elements.
//!
//! A flat container never asks its elements for `==`. Two keys are
//! *equivalent* when neither is ordered before the other under the injected
//! comparator, which lets a comparator deliberately ignore part of a key.

use std::cmp::Ordering;
use std::fmt;

use super::key::KeyOf;

/// A strict weak order over `K`.
///
/// Implementations must be irreflexive and transitive, and equivalence
/// (`!less(a, b) && !less(b, a)`) must be transitive as well. The container
/// does not check this; an inconsistent comparator yields an unspecified order
/// but never an out-of-bounds access.
///
/// # Examples
///
/// ```rust
/// use lambars_flat::flat::{Compare, Greater, Less};
///
/// assert!(Less.less(&1, &2));
/// assert!(Greater.less(&2, &1));
/// assert!(Less.equivalent(&3, &3));
/// ```
pub trait Compare<K: ?Sized> {
    /// Returns `true` if `left` is ordered strictly before `right`.
    fn less(&self, left: &K, right: &K) -> bool;

    /// Returns `true` if neither key is ordered before the other.
    #[inline]
    fn equivalent(&self, left: &K, right: &K) -> bool {
        !self.less(left, right) && !self.less(right, left)
    }

    /// Three-way form of [`less`](Compare::less), used for stable sorting.
    #[inline]
    fn ordering(&self, left: &K, right: &K) -> Ordering {
        if self.less(left, right) {
            Ordering::Less
        } else if self.less(right, left) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl<K: ?Sized, C: Compare<K> + ?Sized> Compare<K> for &C {
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        (**self).less(left, right)
    }
}

/// Ascending order by `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Less;

impl<K: Ord + ?Sized> Compare<K> for Less {
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        left < right
    }

    #[inline]
    fn ordering(&self, left: &K, right: &K) -> Ordering {
        left.cmp(right)
    }
}

/// Descending order by `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Greater;

impl<K: Ord + ?Sized> Compare<K> for Greater {
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        left > right
    }

    #[inline]
    fn ordering(&self, left: &K, right: &K) -> Ordering {
        right.cmp(left)
    }
}

/// Adapts a `less`-style closure into a [`Compare`].
///
/// The closure may capture state, so containers built with `CompareFn`
/// generally have no `Default` comparator and must be created with
/// [`with_compare`](crate::flat::FlatTree::with_compare).
///
/// # Examples
///
/// ```rust
/// use lambars_flat::flat::{CompareFn, FlatSet};
///
/// let by_magnitude = CompareFn(|left: &i32, right: &i32| left.abs() < right.abs());
/// let mut set = FlatSet::with_compare(by_magnitude);
/// set.insert(-3);
/// set.insert(2);
/// // 3 is equivalent to -3 under this ordering, so it is rejected.
/// assert!(!set.insert(3).1);
/// assert_eq!(set.as_slice(), &[2, -3]);
/// ```
#[derive(Clone, Copy)]
pub struct CompareFn<F>(pub F);

impl<K: ?Sized, F> Compare<K> for CompareFn<F>
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        (self.0)(left, right)
    }
}

impl<F> fmt::Debug for CompareFn<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("CompareFn(..)")
    }
}

/// Compares whole elements by their extracted keys.
///
/// Returned by [`value_comp`](crate::flat::FlatTree::value_comp) so callers can
/// run their own sorted algorithms against the container's order.
pub struct ValueCompare<'a, E, C> {
    extractor: &'a E,
    compare: &'a C,
}

impl<'a, E, C> ValueCompare<'a, E, C> {
    #[inline]
    pub(crate) const fn new(extractor: &'a E, compare: &'a C) -> Self {
        Self { extractor, compare }
    }
}

impl<E, C> Clone for ValueCompare<'_, E, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, C> Copy for ValueCompare<'_, E, C> {}

impl<T, E, C> Compare<T> for ValueCompare<'_, E, C>
where
    E: KeyOf<T>,
    C: Compare<E::Key>,
{
    #[inline]
    fn less(&self, left: &T, right: &T) -> bool {
        self.compare
            .less(self.extractor.key_of(left), self.extractor.key_of(right))
    }
}

impl<E, C> fmt::Debug for ValueCompare<'_, E, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("ValueCompare(..)")
    }
}
