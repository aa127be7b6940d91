//! Binary-search primitives over a sorted slice.
//!
//! Every function takes the slice, the key extractor and the comparator
//! explicitly, so the same primitives serve the container itself and the
//! sorted algorithms in [`algorithm`](super::algorithm). Results are indices
//! in `0..=slice.len()`; none of them can index out of bounds, whatever the
//! comparator answers.

use super::compare::Compare;
use super::key::KeyOf;

/// Index of the first element whose key is not ordered before `key`.
#[inline]
pub(crate) fn lower_bound<T, E, C>(
    slice: &[T],
    extractor: &E,
    compare: &C,
    key: &E::Key,
) -> usize
where
    E: KeyOf<T>,
    C: Compare<E::Key>,
{
    slice.partition_point(|element| compare.less(extractor.key_of(element), key))
}

/// Index of the first element whose key is ordered after `key`.
#[inline]
pub(crate) fn upper_bound<T, E, C>(
    slice: &[T],
    extractor: &E,
    compare: &C,
    key: &E::Key,
) -> usize
where
    E: KeyOf<T>,
    C: Compare<E::Key>,
{
    slice.partition_point(|element| !compare.less(key, extractor.key_of(element)))
}

/// `(lower_bound, upper_bound)` for `key`.
///
/// The upper bound is searched only in the suffix starting at the lower bound.
pub(crate) fn equal_range<T, E, C>(
    slice: &[T],
    extractor: &E,
    compare: &C,
    key: &E::Key,
) -> (usize, usize)
where
    E: KeyOf<T>,
    C: Compare<E::Key>,
{
    let lower = lower_bound(slice, extractor, compare, key);
    let upper = lower + upper_bound(&slice[lower..], extractor, compare, key);
    (lower, upper)
}

/// Index of the element equivalent to `key`, if any.
///
/// Among several equivalent elements the first one is returned.
#[inline]
pub(crate) fn find<T, E, C>(
    slice: &[T],
    extractor: &E,
    compare: &C,
    key: &E::Key,
) -> Option<usize>
where
    E: KeyOf<T>,
    C: Compare<E::Key>,
{
    let index = lower_bound(slice, extractor, compare, key);
    slice
        .get(index)
        .filter(|element| !compare.less(key, extractor.key_of(element)))
        .map(|_| index)
}

/// Where `key` belongs: `Ok(index)` of an equivalent element, or
/// `Err(index)` of the slot a new element must be inserted at.
#[inline]
pub(crate) fn locate<T, E, C>(
    slice: &[T],
    extractor: &E,
    compare: &C,
    key: &E::Key,
) -> Result<usize, usize>
where
    E: KeyOf<T>,
    C: Compare<E::Key>,
{
    let index = lower_bound(slice, extractor, compare, key);
    match slice.get(index) {
        Some(element) if !compare.less(key, extractor.key_of(element)) => Ok(index),
        _ => Err(index),
    }
}

/// Returns `true` if inserting `key` at `hint` keeps the slice strictly
/// ordered: the predecessor is ordered before `key` and `key` is ordered
/// before the successor. An equivalent neighbour makes the hint unusable.
#[inline]
pub(crate) fn hint_fits<T, E, C>(
    slice: &[T],
    extractor: &E,
    compare: &C,
    hint: usize,
    key: &E::Key,
) -> bool
where
    E: KeyOf<T>,
    C: Compare<E::Key>,
{
    if hint > slice.len() {
        return false;
    }
    let before_successor = slice
        .get(hint)
        .is_none_or(|successor| compare.less(key, extractor.key_of(successor)));
    let after_predecessor = hint
        .checked_sub(1)
        .and_then(|index| slice.get(index))
        .is_none_or(|predecessor| compare.less(extractor.key_of(predecessor), key));
    before_successor && after_predecessor
}

/// Returns `true` if every adjacent pair is strictly ordered.
pub(crate) fn is_strictly_sorted<T, E, C>(slice: &[T], extractor: &E, compare: &C) -> bool
where
    E: KeyOf<T>,
    C: Compare<E::Key>,
{
    slice
        .windows(2)
        .all(|window| compare.less(extractor.key_of(&window[0]), extractor.key_of(&window[1])))
}
