//! Sorted, duplicate-free container over contiguous storage.
//!
//! This module provides [`FlatTree`], the engine behind
//! [`FlatSet`](super::FlatSet) and [`FlatMap`](super::FlatMap). Elements live
//! in a single `Vec`, kept sorted by a key extracted from each element and an
//! injected strict weak order.
//!
//! # Time Complexity
//!
//! | Operation                         | Complexity           |
//! |-----------------------------------|----------------------|
//! | `find` / `lower_bound` / `count`  | O(log n)             |
//! | `insert` / `emplace`              | O(log n) + O(n) shift|
//! | `insert_hint` (valid hint)        | O(1) + O(n) shift    |
//! | `erase` / `erase_key`             | O(n) shift           |
//! | `erase_range`                     | O(n) single shift    |
//! | `erase_if` / `retain`             | O(n), no allocation  |
//! | bulk construction / `assign`      | O(n log n)           |
//! | `swap`                            | O(1)                 |
//!
//! # Duplicates
//!
//! Keys are unique under the comparator's *equivalence*. Inserting an
//! equivalent key never replaces or moves the stored element. Bulk
//! construction behaves as if every input element were inserted in input
//! order: the first occurrence of each key survives.
//!
//! # Positions
//!
//! Any insertion or removal shifts the buffer and may reallocate it, so every
//! [`Position`] obtained earlier becomes stale. Stale positions are detected:
//! [`get_at`](FlatTree::get_at) returns `None`, [`try_erase`](FlatTree::try_erase)
//! returns an error, and hints silently fall back to a full search.
//!
//! # Examples
//!
//! ```rust
//! use lambars_flat::flat::FlatSet;
//!
//! let mut set: FlatSet<i32> = [3, 1, 2, 3].into_iter().collect();
//! assert_eq!(set.as_slice(), &[1, 2, 3]);
//!
//! let (position, inserted) = set.insert(2);
//! assert!(!inserted);
//! assert_eq!(position, set.find(&2));
//!
//! assert_eq!(set.erase_key(&1), 1);
//! assert_eq!(set.erase_key(&1), 0);
//! assert_eq!(set.iter().rev().copied().collect::<Vec<_>>(), vec![3, 2]);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::Index;

use super::compare::{Compare, Less, ValueCompare};
use super::error::FlatTreeError;
use super::key::{Identity, KeyOf};
use super::position::{Position, Stamp};
use super::search;
use super::storage::Storage;

/// Message used when an adopted buffer violates the ordering invariant.
const SORTED_INVARIANT_PANIC_MESSAGE: &str =
    "from_sorted_vec requires strictly increasing keys (sorted + deduplicated)";

/// A sorted, duplicate-free container backed by a contiguous buffer.
///
/// # Type Parameters
///
/// * `T` - The element type. Only needs to be movable.
/// * `E` - The key extractor, see [`KeyOf`]. Defaults to [`Identity`].
/// * `C` - The strict weak order over keys, see [`Compare`]. Defaults to
///   [`Less`]. May carry state and need not implement `Default`.
///
/// # Examples
///
/// ```rust
/// use lambars_flat::flat::{FlatTree, Greater, Identity};
///
/// let mut tree: FlatTree<i32, Identity, Greater> = FlatTree::with_compare(Greater);
/// tree.insert(1);
/// tree.insert(3);
/// tree.insert(2);
/// assert_eq!(tree.as_slice(), &[3, 2, 1]);
/// ```
pub struct FlatTree<T, E = Identity, C = Less> {
    storage: Storage<T>,
    extractor: E,
    compare: C,
    stamp: Stamp,
}

// =============================================================================
// Construction
// =============================================================================

impl<T, E: Default> FlatTree<T, E, Less> {
    /// Creates an empty container ordered by `Ord`. Does not allocate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::FlatSet;
    ///
    /// let set: FlatSet<i32> = FlatSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(E::default(), Less)
    }

    /// Creates an empty container with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut tree = Self::new();
        tree.storage = Storage::with_capacity(capacity);
        tree
    }
}

impl<T, E: Default, C> FlatTree<T, E, C> {
    /// Creates an empty container ordered by `compare`.
    #[inline]
    #[must_use]
    pub fn with_compare(compare: C) -> Self {
        Self::with_parts(E::default(), compare)
    }
}

impl<T, E, C> FlatTree<T, E, C> {
    /// Creates an empty container from an explicit extractor and comparator.
    #[inline]
    #[must_use]
    pub fn with_parts(extractor: E, compare: C) -> Self {
        Self {
            storage: Storage::new(),
            extractor,
            compare,
            stamp: Stamp::fresh(),
        }
    }

    // =========================================================================
    // Storage management
    // =========================================================================

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the container holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns the number of elements the buffer holds without reallocating.
    ///
    /// Always at least [`len`](Self::len).
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Ensures `capacity() >= capacity`. Never shrinks.
    ///
    /// Reallocation invalidates every outstanding position.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `isize::MAX` bytes; aborts on
    /// allocation failure. Use [`try_reserve`](Self::try_reserve) to handle
    /// either case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::FlatSet;
    ///
    /// let mut set: FlatSet<i32> = [1, 2, 3].into_iter().collect();
    /// set.reserve(5);
    /// assert!(set.capacity() >= 5);
    /// set.reserve(1);
    /// assert!(set.capacity() >= 5);
    /// ```
    pub fn reserve(&mut self, capacity: usize) {
        if self.storage.reserve(capacity) {
            self.restamp();
        }
    }

    /// Fallible form of [`reserve`](Self::reserve).
    ///
    /// # Errors
    ///
    /// Returns [`FlatTreeError::Reserve`] if the capacity overflows or the
    /// allocator fails. The container is unchanged in that case.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), FlatTreeError> {
        if self.storage.try_reserve(capacity)? {
            self.restamp();
        }
        Ok(())
    }

    /// Reduces capacity toward [`len`](Self::len). Best effort.
    pub fn shrink_to_fit(&mut self) {
        if self.storage.shrink_to_fit() {
            self.restamp();
        }
    }

    /// Drops every element. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.restamp();
    }

    // =========================================================================
    // Access and iteration
    // =========================================================================

    /// Returns the elements as a sorted slice.
    #[inline]
    #[must_use]
    pub const fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Consumes the container, returning the sorted buffer.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.storage.into_vec()
    }

    /// Returns an iterator over the elements in order.
    ///
    /// The iterator is double-ended; `iter().rev()` walks the container
    /// backwards.
    #[inline]
    pub fn iter(&self) -> FlatTreeIterator<'_, T> {
        FlatTreeIterator {
            inner: self.as_slice().iter(),
        }
    }

    /// Returns an iterator over the elements from `position` to the end.
    ///
    /// Returns `None` if `position` is stale or past the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::FlatSet;
    ///
    /// let set: FlatSet<i32> = (1..=5).collect();
    /// let tail: Vec<_> = set.iter_from(set.find(&3)).into_iter().flatten().collect();
    /// assert_eq!(tail, vec![&3, &4, &5]);
    /// ```
    #[must_use]
    pub fn iter_from(&self, position: Position) -> Option<FlatTreeIterator<'_, T>> {
        let index = self.checked_index(position).ok()?;
        Some(FlatTreeIterator {
            inner: self.as_slice()[index..].iter(),
        })
    }

    /// Number of elements in `[first, last)`.
    ///
    /// Returns `None` unless both positions are current for this container
    /// and `first` is not after `last`.
    #[must_use]
    pub fn distance(&self, first: Position, last: Position) -> Option<usize> {
        let first = self.checked_index(first).ok()?;
        let last = self.checked_index(last).ok()?;
        last.checked_sub(first)
    }

    /// Returns the smallest element.
    #[inline]
    #[must_use]
    pub const fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Returns the largest element.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Position of the first element.
    #[inline]
    #[must_use]
    pub const fn begin(&self) -> Position {
        Position::new(0, self.stamp)
    }

    /// Position one past the last element.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> Position {
        self.position(self.len())
    }

    /// Returns the element at `position`, or `None` if the position is stale
    /// or names no element.
    #[inline]
    #[must_use]
    pub fn get_at(&self, position: Position) -> Option<&T> {
        if position.stamp() == self.stamp {
            self.as_slice().get(position.index())
        } else {
            None
        }
    }

    /// Returns the elements in `[first, last)`, or `None` if either position
    /// is stale or the range is malformed.
    #[must_use]
    pub fn get_range(&self, first: Position, last: Position) -> Option<&[T]> {
        let first = self.checked_index(first).ok()?;
        let last = self.checked_index(last).ok()?;
        self.as_slice().get(first..last)
    }

    /// Returns the key comparator.
    #[inline]
    #[must_use]
    pub const fn key_comp(&self) -> &C {
        &self.compare
    }

    /// Returns the key extractor.
    #[inline]
    #[must_use]
    pub const fn key_extractor(&self) -> &E {
        &self.extractor
    }

    // =========================================================================
    // Positional erasure
    // =========================================================================

    /// Removes the element at `position`.
    ///
    /// Returns the position of the element that followed it, which now
    /// occupies the same index (the end position if the last element was
    /// removed).
    ///
    /// # Panics
    ///
    /// Panics if `position` is stale or does not name an element. See
    /// [`try_erase`](Self::try_erase) for the checked form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::FlatSet;
    ///
    /// let mut set: FlatSet<i32> = (1..=4).collect();
    /// let next = set.erase(set.begin().advance(1));
    /// assert_eq!(set.as_slice(), &[1, 3, 4]);
    /// assert_eq!(set.get_at(next), Some(&3));
    /// ```
    #[track_caller]
    pub fn erase(&mut self, position: Position) -> Position {
        match self.try_erase(position) {
            Ok(next) => next,
            Err(error) => panic!("FlatTree::erase: {error}"),
        }
    }

    /// Checked form of [`erase`](Self::erase).
    ///
    /// # Errors
    ///
    /// Returns [`FlatTreeError::StalePosition`] or
    /// [`FlatTreeError::OutOfBounds`]; the container is unchanged.
    pub fn try_erase(&mut self, position: Position) -> Result<Position, FlatTreeError> {
        let index = self.checked_index(position)?;
        if index >= self.len() {
            return Err(FlatTreeError::OutOfBounds {
                index,
                length: self.len(),
            });
        }
        drop(self.storage.remove_at(index));
        self.restamp();
        Ok(self.position(index))
    }

    /// Removes the elements in `[first, last)` with a single shift.
    ///
    /// Returns the position following the removed range. An empty range
    /// changes nothing and returns `first`.
    ///
    /// # Panics
    ///
    /// Panics if either position is stale or past the end, or if `first` is
    /// after `last`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::FlatSet;
    ///
    /// let mut set: FlatSet<i32> = (1..=8).collect();
    /// let begin = set.begin();
    /// let after = set.erase_range(begin.advance(2), begin.advance(5));
    /// assert_eq!(set.as_slice(), &[1, 2, 6, 7, 8]);
    /// assert_eq!(set.get_at(after), Some(&6));
    /// ```
    #[track_caller]
    pub fn erase_range(&mut self, first: Position, last: Position) -> Position {
        match self.try_erase_range(first, last) {
            Ok(next) => next,
            Err(error) => panic!("FlatTree::erase_range: {error}"),
        }
    }

    /// Checked form of [`erase_range`](Self::erase_range).
    ///
    /// # Errors
    ///
    /// Returns [`FlatTreeError::StalePosition`],
    /// [`FlatTreeError::OutOfBounds`] or [`FlatTreeError::InvalidRange`]; the
    /// container is unchanged.
    pub fn try_erase_range(
        &mut self,
        first: Position,
        last: Position,
    ) -> Result<Position, FlatTreeError> {
        let first_index = self.checked_index(first)?;
        let last_index = self.checked_index(last)?;
        if first_index > last_index {
            return Err(FlatTreeError::InvalidRange {
                first: first_index,
                last: last_index,
            });
        }
        if first_index < last_index {
            self.storage.remove_range(first_index..last_index);
            self.restamp();
        }
        Ok(self.position(first_index))
    }

    // =========================================================================
    // Predicate-driven erasure and swap
    // =========================================================================

    /// Removes every element for which `predicate` returns `true`.
    ///
    /// Survivors keep their relative order. Runs in a single compaction pass
    /// without allocating. Returns the number of removed elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::FlatSet;
    ///
    /// let mut set: FlatSet<i32> = [1, 2, 3, 4].into_iter().collect();
    /// assert_eq!(set.erase_if(|value| value % 2 == 1), 2);
    /// assert_eq!(set.as_slice(), &[2, 4]);
    /// ```
    pub fn erase_if<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let removed = self.storage.retain(|element| !predicate(element));
        if removed > 0 {
            self.restamp();
        }
        removed
    }

    /// Keeps only the elements for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.erase_if(|element| !keep(element));
    }

    /// Exchanges the contents, comparators and extractors of two containers.
    ///
    /// Positions follow the buffer they were taken from.
    #[inline]
    pub const fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    #[inline]
    const fn position(&self, index: usize) -> Position {
        Position::new(index, self.stamp)
    }

    /// Marks every outstanding position as stale.
    #[inline]
    fn restamp(&mut self) {
        self.stamp = Stamp::fresh();
    }

    /// Index of a current position in `0..=len`.
    fn checked_index(&self, position: Position) -> Result<usize, FlatTreeError> {
        let index = position.index();
        if position.stamp() != self.stamp {
            return Err(FlatTreeError::StalePosition { index });
        }
        if index > self.len() {
            return Err(FlatTreeError::OutOfBounds {
                index,
                length: self.len(),
            });
        }
        Ok(index)
    }

    /// Mutable view for wrappers that only hand out non-key parts.
    #[cfg_attr(not(feature = "map"), allow(dead_code))]
    #[inline]
    pub(crate) const fn elements_mut(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }
}

// =============================================================================
// Ordered operations
// =============================================================================

impl<T, E, C> FlatTree<T, E, C>
where
    E: KeyOf<T>,
    C: Compare<E::Key>,
{
    /// Builds a container from any sequence, keeping the first occurrence of
    /// each key.
    ///
    /// The input is traversed once and buffered, then stably sorted, so ties
    /// keep input order, and deduplicated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::{CompareFn, FlatTree, Identity};
    ///
    /// let by_first = CompareFn(|left: &(i32, i32), right: &(i32, i32)| left.0 < right.0);
    /// let tree = FlatTree::from_iter_with_parts(
    ///     [(0, 0), (1, 0), (0, 1), (2, 0), (0, 2), (1, 1)],
    ///     Identity,
    ///     by_first,
    /// );
    /// assert_eq!(tree.as_slice(), &[(0, 0), (1, 0), (2, 0)]);
    /// ```
    pub fn from_iter_with_parts<I>(iter: I, extractor: E, compare: C) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::with_parts(extractor, compare);
        tree.storage.extend(iter);
        tree.normalize();
        tree
    }

    /// Builds a container from `iter` ordered by `compare`.
    pub fn from_iter_with_compare<I>(iter: I, compare: C) -> Self
    where
        I: IntoIterator<Item = T>,
        E: Default,
    {
        Self::from_iter_with_parts(iter, E::default(), compare)
    }

    /// Adopts a buffer that is already strictly sorted by `compare`.
    ///
    /// # Preconditions
    ///
    /// Keys must be strictly increasing under `compare`. Checked with
    /// `debug_assert!`; in release builds invalid input yields a container
    /// with unspecified search results (a logic error, not memory unsafety).
    #[must_use]
    pub fn from_sorted_vec(elements: Vec<T>, extractor: E, compare: C) -> Self {
        debug_assert!(
            search::is_strictly_sorted(&elements, &extractor, &compare),
            "{}",
            SORTED_INVARIANT_PANIC_MESSAGE
        );
        Self {
            storage: Storage::from_vec(elements),
            extractor,
            compare,
            stamp: Stamp::fresh(),
        }
    }

    /// Replaces the contents with `iter`, with the same rules as bulk
    /// construction. The buffer is reused.
    pub fn assign<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        // Restamp first so old positions stay rejected if the comparator panics.
        self.restamp();
        self.storage.clear();
        self.storage.extend(iter);
        self.normalize();
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Position of the element equivalent to `key`, or [`end`](Self::end).
    #[inline]
    #[must_use]
    pub fn find(&self, key: &E::Key) -> Position {
        let index = search::find(self.as_slice(), &self.extractor, &self.compare, key)
            .unwrap_or_else(|| self.len());
        self.position(index)
    }

    /// Returns the element equivalent to `key`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &E::Key) -> Option<&T> {
        search::find(self.as_slice(), &self.extractor, &self.compare, key)
            .map(|index| &self.as_slice()[index])
    }

    /// Returns `true` if an element equivalent to `key` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &E::Key) -> bool {
        search::find(self.as_slice(), &self.extractor, &self.compare, key).is_some()
    }

    /// Number of elements equivalent to `key`: 0 or 1.
    #[inline]
    #[must_use]
    pub fn count(&self, key: &E::Key) -> usize {
        usize::from(self.contains(key))
    }

    /// First position whose key is not ordered before `key`.
    #[inline]
    #[must_use]
    pub fn lower_bound(&self, key: &E::Key) -> Position {
        self.position(search::lower_bound(
            self.as_slice(),
            &self.extractor,
            &self.compare,
            key,
        ))
    }

    /// First position whose key is ordered after `key`.
    #[inline]
    #[must_use]
    pub fn upper_bound(&self, key: &E::Key) -> Position {
        self.position(search::upper_bound(
            self.as_slice(),
            &self.extractor,
            &self.compare,
            key,
        ))
    }

    /// `(lower_bound(key), upper_bound(key))`: empty, or exactly the element
    /// equivalent to `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::FlatSet;
    ///
    /// let set: FlatSet<i32> = [5, 7, 9].into_iter().collect();
    /// let (lower, upper) = set.equal_range(&7);
    /// assert_eq!(set.get_range(lower, upper), Some(&[7][..]));
    /// let (lower, upper) = set.equal_range(&8);
    /// assert_eq!(lower, upper);
    /// ```
    #[must_use]
    pub fn equal_range(&self, key: &E::Key) -> (Position, Position) {
        let (lower, upper) =
            search::equal_range(self.as_slice(), &self.extractor, &self.compare, key);
        (self.position(lower), self.position(upper))
    }

    /// Comparator over whole elements, ordering them by extracted key.
    #[inline]
    #[must_use]
    pub const fn value_comp(&self) -> ValueCompare<'_, E, C> {
        ValueCompare::new(&self.extractor, &self.compare)
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Inserts `value` unless an equivalent element is present.
    ///
    /// Returns the position of the element with that key and whether
    /// `value` was inserted. On a duplicate the stored element is left
    /// untouched and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::{First, FlatTree};
    ///
    /// let mut pairs: FlatTree<(i32, &str), First> = FlatTree::new();
    /// assert!(pairs.insert((1, "one")).1);
    /// assert!(!pairs.insert((1, "uno")).1);
    /// assert_eq!(pairs.get(&1), Some(&(1, "one")));
    /// ```
    pub fn insert(&mut self, value: T) -> (Position, bool) {
        let located = search::locate(
            self.as_slice(),
            &self.extractor,
            &self.compare,
            self.extractor.key_of(&value),
        );
        match located {
            Ok(index) => (self.position(index), false),
            Err(index) => (self.insert_at(index, value), true),
        }
    }

    /// Inserts `value`, trying `hint` as the insertion slot first.
    ///
    /// The hint is used only if it is current and `value` sorts strictly
    /// between its neighbours; otherwise this is [`insert`](Self::insert).
    /// Returns the position of the element with `value`'s key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::FlatSet;
    ///
    /// let mut set: FlatSet<i32> = FlatSet::new();
    /// for value in [2, 1, 3, 3] {
    ///     let hint = set.end();
    ///     set.insert_hint(hint, value);
    /// }
    /// assert_eq!(set.as_slice(), &[1, 2, 3]);
    /// ```
    pub fn insert_hint(&mut self, hint: Position, value: T) -> Position {
        if let Ok(index) = self.checked_index(hint) {
            let fits = search::hint_fits(
                self.as_slice(),
                &self.extractor,
                &self.compare,
                index,
                self.extractor.key_of(&value),
            );
            if fits {
                return self.insert_at(index, value);
            }
        }
        self.insert(value).0
    }

    /// Builds an element from `arguments` and inserts it.
    ///
    /// The element is always constructed, even when an equivalent key is
    /// already present and the new element ends up discarded.
    pub fn emplace<A>(&mut self, arguments: A) -> (Position, bool)
    where
        A: Into<T>,
    {
        self.insert(arguments.into())
    }

    /// Builds an element with `constructor` and inserts it.
    ///
    /// `constructor` runs before the duplicate check, so a discarded
    /// duplicate still pays its full construction cost.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::FlatSet;
    ///
    /// let mut set: FlatSet<String> = FlatSet::new();
    /// let mut built = 0;
    /// for _ in 0..2 {
    ///     set.emplace_with(|| {
    ///         built += 1;
    ///         "key".to_string()
    ///     });
    /// }
    /// assert_eq!(set.len(), 1);
    /// assert_eq!(built, 2);
    /// ```
    pub fn emplace_with<F>(&mut self, constructor: F) -> (Position, bool)
    where
        F: FnOnce() -> T,
    {
        let candidate = constructor();
        self.insert(candidate)
    }

    /// Hinted form of [`emplace`](Self::emplace).
    pub fn emplace_hint<A>(&mut self, hint: Position, arguments: A) -> Position
    where
        A: Into<T>,
    {
        self.insert_hint(hint, arguments.into())
    }

    /// Hinted form of [`emplace_with`](Self::emplace_with).
    pub fn emplace_hint_with<F>(&mut self, hint: Position, constructor: F) -> Position
    where
        F: FnOnce() -> T,
    {
        let candidate = constructor();
        self.insert_hint(hint, candidate)
    }

    /// Inserts every element of `iter` as repeated [`insert`](Self::insert)
    /// calls in input order would: present keys and first occurrences win.
    ///
    /// Implemented as one append followed by a stable re-sort, so large
    /// batches cost O((n + m) log(n + m)) instead of O(n * m).
    pub fn insert_range<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        let (length, capacity) = (self.len(), self.capacity());
        self.storage.extend(iter);
        if self.len() != length || self.capacity() != capacity {
            self.restamp();
        }
        if self.len() != length {
            self.normalize();
        }
    }

    // =========================================================================
    // Erasure by key
    // =========================================================================

    /// Removes the element equivalent to `key`. Returns the number removed.
    pub fn erase_key(&mut self, key: &E::Key) -> usize {
        usize::from(self.take(key).is_some())
    }

    /// Removes and returns the element equivalent to `key`.
    pub fn take(&mut self, key: &E::Key) -> Option<T> {
        let index = search::find(self.as_slice(), &self.extractor, &self.compare, key)?;
        let element = self.storage.remove_at(index);
        self.restamp();
        Some(element)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn insert_at(&mut self, index: usize, value: T) -> Position {
        self.storage.insert_at(index, value);
        self.restamp();
        self.position(index)
    }

    /// Restores sortedness and uniqueness after an unordered append.
    fn normalize(&mut self) {
        let Self {
            storage,
            extractor,
            compare,
            ..
        } = self;
        let dropped = storage.sort_dedup_by(
            |left, right| compare.ordering(extractor.key_of(left), extractor.key_of(right)),
            |retained, candidate| {
                compare.equivalent(extractor.key_of(retained), extractor.key_of(candidate))
            },
        );
        if dropped > 0 {
            tracing::trace!(
                target: "lambars_flat::tree",
                dropped,
                length = storage.len(),
                "discarded equivalent keys during bulk build"
            );
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over references to the elements of a [`FlatTree`], in order.
#[derive(Clone)]
pub struct FlatTreeIterator<'a, T> {
    inner: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for FlatTreeIterator<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for FlatTreeIterator<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for FlatTreeIterator<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for FlatTreeIterator<'_, T> {}

/// Owning iterator over the elements of a [`FlatTree`], in order.
pub struct FlatTreeIntoIterator<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> Iterator for FlatTreeIntoIterator<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for FlatTreeIntoIterator<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for FlatTreeIntoIterator<T> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for FlatTreeIntoIterator<T> {}

impl<T, E, C> IntoIterator for FlatTree<T, E, C> {
    type Item = T;
    type IntoIter = FlatTreeIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        FlatTreeIntoIterator {
            inner: self.into_vec().into_iter(),
        }
    }
}

impl<'a, T, E, C> IntoIterator for &'a FlatTree<T, E, C> {
    type Item = &'a T;
    type IntoIter = FlatTreeIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, E: Default, C: Default> Default for FlatTree<T, E, C> {
    #[inline]
    fn default() -> Self {
        Self::with_parts(E::default(), C::default())
    }
}

impl<T: Clone, E: Clone, C: Clone> Clone for FlatTree<T, E, C> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            extractor: self.extractor.clone(),
            compare: self.compare.clone(),
            stamp: Stamp::fresh(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.storage.clone_from(&source.storage);
        self.extractor.clone_from(&source.extractor);
        self.compare.clone_from(&source.compare);
        self.restamp();
    }
}

impl<T, E, C> FromIterator<T> for FlatTree<T, E, C>
where
    E: KeyOf<T> + Default,
    C: Compare<E::Key> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with_parts(iter, E::default(), C::default())
    }
}

impl<T, E, C> Extend<T> for FlatTree<T, E, C>
where
    E: KeyOf<T>,
    C: Compare<E::Key>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_range(iter);
    }
}

impl<T, E, C> From<Vec<T>> for FlatTree<T, E, C>
where
    E: KeyOf<T> + Default,
    C: Compare<E::Key> + Default,
{
    fn from(elements: Vec<T>) -> Self {
        elements.into_iter().collect()
    }
}

impl<T, E, C, const N: usize> From<[T; N]> for FlatTree<T, E, C>
where
    E: KeyOf<T> + Default,
    C: Compare<E::Key> + Default,
{
    fn from(elements: [T; N]) -> Self {
        elements.into_iter().collect()
    }
}

/// Indexing by position.
///
/// # Panics
///
/// Panics if `position` is stale or names no element.
impl<T, E, C> Index<Position> for FlatTree<T, E, C> {
    type Output = T;

    #[track_caller]
    fn index(&self, position: Position) -> &T {
        match self.get_at(position) {
            Some(element) => element,
            None => panic!(
                "FlatTree index: {}",
                self.checked_index(position)
                    .err()
                    .unwrap_or_else(|| FlatTreeError::OutOfBounds {
                        index: position.index(),
                        length: self.len(),
                    })
            ),
        }
    }
}

/// Containers compare as their element sequences. Comparators and extractors
/// never take part, so containers with different comparator instances or
/// types compare equal when they hold equal elements in the same order.
impl<T, E, C, E2, C2> PartialEq<FlatTree<T, E2, C2>> for FlatTree<T, E, C>
where
    T: PartialEq,
{
    #[inline]
    fn eq(&self, other: &FlatTree<T, E2, C2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, E, C> Eq for FlatTree<T, E, C> {}

/// Lexicographic order of the element sequences, by `T`'s own ordering.
impl<T, E, C, E2, C2> PartialOrd<FlatTree<T, E2, C2>> for FlatTree<T, E, C>
where
    T: PartialOrd,
{
    #[inline]
    fn partial_cmp(&self, other: &FlatTree<T, E2, C2>) -> Option<std::cmp::Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, E, C> Ord for FlatTree<T, E, C> {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

/// Hashes the length followed by each element in order, consistent with
/// `PartialEq`.
impl<T: Hash, E, C> Hash for FlatTree<T, E, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: fmt::Debug, E, C> fmt::Debug for FlatTree<T, E, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, E, C> fmt::Display for FlatTree<T, E, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(FlatTree<i32>: Send, Sync, Clone, Default);
static_assertions::assert_impl_all!(FlatTree<String>: Send, Sync, Clone, Default);
static_assertions::assert_impl_all!(Position: Copy, Send, Sync);

// =============================================================================
// Rayon Support
// =============================================================================

#[cfg(feature = "rayon")]
impl<T: Sync, E, C> FlatTree<T, E, C> {
    /// Returns a parallel iterator over the elements.
    ///
    /// Element order is preserved by order-aware combinators such as
    /// `collect`.
    #[must_use]
    pub fn par_iter(&self) -> rayon::slice::Iter<'_, T> {
        use rayon::prelude::*;
        self.as_slice().par_iter()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T, E, C> serde::Serialize for FlatTree<T, E, C>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
struct FlatTreeVisitor<T, E, C> {
    marker: std::marker::PhantomData<fn() -> FlatTree<T, E, C>>,
}

#[cfg(feature = "serde")]
impl<'de, T, E, C> serde::de::Visitor<'de> for FlatTreeVisitor<T, E, C>
where
    T: serde::Deserialize<'de>,
    E: KeyOf<T> + Default,
    C: Compare<E::Key> + Default,
{
    type Value = FlatTree<T, E, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        // Buffer first, then build once: first occurrence of each key wins.
        let mut elements = Vec::with_capacity(access.size_hint().unwrap_or(0).min(4096));
        while let Some(element) = access.next_element()? {
            elements.push(element);
        }
        Ok(elements.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl<'de, T, E, C> serde::Deserialize<'de> for FlatTree<T, E, C>
where
    T: serde::Deserialize<'de>,
    E: KeyOf<T> + Default,
    C: Compare<E::Key> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(FlatTreeVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
