//! Contiguous element storage.
//!
//! [`Storage`] owns the buffer of a flat container and is the only place that
//! allocates. It knows nothing about ordering: callers decide *where* elements
//! go, storage moves them and keeps `len <= capacity`. Capacity changes only
//! on explicit requests or when an insertion does not fit.

use std::ops::Range;

use super::error::FlatTreeError;

/// Growable contiguous buffer with explicit capacity control.
#[derive(Default)]
pub(crate) struct Storage<T> {
    elements: Vec<T>,
}

impl<T: Clone> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
        }
    }

    /// Reuses the existing buffer when it is large enough.
    fn clone_from(&mut self, source: &Self) {
        self.elements.clone_from(&source.elements);
    }
}

impl<T> Storage<T> {
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Adopts `elements` as-is; ordering is the caller's responsibility.
    #[inline]
    pub(crate) const fn from_vec(elements: Vec<T>) -> Self {
        Self { elements }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> usize {
        self.elements.capacity()
    }

    #[inline]
    pub(crate) const fn as_slice(&self) -> &[T] {
        self.elements.as_slice()
    }

    #[inline]
    pub(crate) const fn as_mut_slice(&mut self) -> &mut [T] {
        self.elements.as_mut_slice()
    }

    #[inline]
    pub(crate) fn into_vec(self) -> Vec<T> {
        self.elements
    }

    /// Ensures room for `capacity` elements in total. Never shrinks.
    ///
    /// Returns `true` if the buffer was reallocated.
    pub(crate) fn reserve(&mut self, capacity: usize) -> bool {
        let before = self.capacity();
        if capacity <= before {
            return false;
        }
        self.elements.reserve_exact(capacity - self.len());
        self.trace_reallocation(before, "reserve");
        true
    }

    /// Fallible form of [`reserve`](Self::reserve).
    pub(crate) fn try_reserve(&mut self, capacity: usize) -> Result<bool, FlatTreeError> {
        let before = self.capacity();
        if capacity <= before {
            return Ok(false);
        }
        self.elements.try_reserve_exact(capacity - self.len())?;
        self.trace_reallocation(before, "try_reserve");
        Ok(true)
    }

    /// Releases spare capacity. Returns `true` if the buffer was reallocated.
    pub(crate) fn shrink_to_fit(&mut self) -> bool {
        let before = self.capacity();
        self.elements.shrink_to_fit();
        let changed = self.capacity() != before;
        if changed {
            self.trace_reallocation(before, "shrink_to_fit");
        }
        changed
    }

    /// Drops every element and keeps the buffer.
    #[inline]
    pub(crate) fn clear(&mut self) {
        self.elements.clear();
    }

    /// Shifts `index..` one slot right and writes `value` at `index`.
    pub(crate) fn insert_at(&mut self, index: usize, value: T) {
        let before = self.capacity();
        self.elements.insert(index, value);
        if self.capacity() != before {
            self.trace_reallocation(before, "grow");
        }
    }

    /// Removes the element at `index`, shifting the tail left.
    #[inline]
    pub(crate) fn remove_at(&mut self, index: usize) -> T {
        self.elements.remove(index)
    }

    /// Removes `range` in a single shift of the tail.
    #[inline]
    pub(crate) fn remove_range(&mut self, range: Range<usize>) {
        self.elements.drain(range);
    }

    /// Appends without regard to order; used by bulk paths that re-sort.
    pub(crate) fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let before = self.capacity();
        self.elements.extend(iter);
        if self.capacity() != before {
            self.trace_reallocation(before, "grow");
        }
    }

    /// Keeps elements for which `keep` returns `true`, in one compaction pass.
    ///
    /// Returns the number of removed elements.
    pub(crate) fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.len();
        self.elements.retain(keep);
        before - self.len()
    }

    /// Stable sort followed by removal of every element equivalent to its
    /// predecessor, so the first occurrence of each run survives.
    ///
    /// Returns the number of removed duplicates.
    pub(crate) fn sort_dedup_by<O, S>(&mut self, ordering: O, mut same: S) -> usize
    where
        O: FnMut(&T, &T) -> std::cmp::Ordering,
        S: FnMut(&T, &T) -> bool,
    {
        let before = self.len();
        self.elements.sort_by(ordering);
        // `dedup_by` passes the candidate first and the retained predecessor second.
        self.elements.dedup_by(|candidate, retained| same(retained, candidate));
        before - self.len()
    }

    fn trace_reallocation(&self, before: usize, reason: &'static str) {
        tracing::trace!(
            target: "lambars_flat::storage",
            reason,
            from = before,
            to = self.capacity(),
            length = self.len(),
            "storage reallocated"
        );
    }
}
