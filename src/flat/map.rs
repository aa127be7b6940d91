//! Sorted key/value map over contiguous storage.
//!
//! [`FlatMap`] stores `(K, V)` pairs in a [`FlatTree`] ordered by key. Keys are
//! never handed out mutably, so the map can expose mutable *values* without
//! risking the ordering invariant.
//!
//! # Examples
//!
//! ```rust
//! use lambars_flat::flat::FlatMap;
//!
//! let mut scores = FlatMap::new();
//! scores.insert("carol", 3);
//! scores.insert("alice", 1);
//! scores.insert("bob", 2);
//!
//! assert_eq!(scores.keys().copied().collect::<Vec<_>>(), vec!["alice", "bob", "carol"]);
//!
//! *scores.get_or_insert_with("dave", || 0) += 10;
//! assert_eq!(scores[&"dave"], 10);
//!
//! scores.retain(|_, score| *score > 1);
//! assert_eq!(scores.len(), 3);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::Index;

use super::compare::{Compare, Less};
use super::error::FlatTreeError;
use super::key::First;
use super::position::Position;
use super::tree::{FlatTree, FlatTreeIntoIterator};

/// A sorted map with unique keys, backed by a single `Vec<(K, V)>`.
///
/// Inserting a key that is already present never replaces the stored value;
/// use [`insert_or_assign`](Self::insert_or_assign) for that.
pub struct FlatMap<K, V, C = Less> {
    tree: FlatTree<(K, V), First, C>,
}

impl<K, V> FlatMap<K, V, Less> {
    /// Creates an empty map ordered by `Ord`. Does not allocate.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: FlatTree::new(),
        }
    }

    /// Creates an empty map with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: FlatTree::with_capacity(capacity),
        }
    }
}

impl<K, V, C> FlatMap<K, V, C> {
    /// Creates an empty map ordered by `compare`.
    #[inline]
    #[must_use]
    pub fn with_compare(compare: C) -> Self {
        Self {
            tree: FlatTree::with_compare(compare),
        }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of entries the buffer holds without reallocating.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Ensures `capacity() >= capacity`. Never shrinks.
    pub fn reserve(&mut self, capacity: usize) {
        self.tree.reserve(capacity);
    }

    /// Fallible form of [`reserve`](Self::reserve).
    ///
    /// # Errors
    ///
    /// Returns [`FlatTreeError::Reserve`] if the allocation cannot be made.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), FlatTreeError> {
        self.tree.try_reserve(capacity)
    }

    /// Reduces capacity toward [`len`](Self::len).
    pub fn shrink_to_fit(&mut self) {
        self.tree.shrink_to_fit();
    }

    /// Removes every entry. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the entries as a slice sorted by key.
    #[inline]
    #[must_use]
    pub const fn as_slice(&self) -> &[(K, V)] {
        self.tree.as_slice()
    }

    /// Consumes the map, returning the sorted entries.
    #[must_use]
    pub fn into_vec(self) -> Vec<(K, V)> {
        self.tree.into_vec()
    }

    /// Returns the key comparator.
    #[inline]
    #[must_use]
    pub const fn key_comp(&self) -> &C {
        self.tree.key_comp()
    }

    /// Iterates over `(key, value)` in key order.
    pub fn iter(&self) -> FlatMapIterator<'_, K, V> {
        FlatMapIterator {
            inner: self.as_slice().iter(),
        }
    }

    /// Iterates over `(key, mutable value)` in key order.
    pub fn iter_mut(&mut self) -> FlatMapIterMut<'_, K, V> {
        FlatMapIterMut {
            inner: self.tree.elements_mut().iter_mut(),
        }
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> FlatMapKeys<'_, K, V> {
        FlatMapKeys {
            inner: self.as_slice().iter(),
        }
    }

    /// Iterates over the values in key order.
    pub fn values(&self) -> FlatMapValues<'_, K, V> {
        FlatMapValues {
            inner: self.as_slice().iter(),
        }
    }

    /// Iterates over mutable values in key order.
    pub fn values_mut(&mut self) -> FlatMapValuesMut<'_, K, V> {
        FlatMapValuesMut {
            inner: self.tree.elements_mut().iter_mut(),
        }
    }

    /// Entry with the smallest key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|(key, value)| (key, value))
    }

    /// Entry with the largest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|(key, value)| (key, value))
    }

    /// Position of the first entry.
    #[inline]
    #[must_use]
    pub const fn begin(&self) -> Position {
        self.tree.begin()
    }

    /// Position one past the last entry.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> Position {
        self.tree.end()
    }

    /// Entry at `position`, or `None` if the position is stale or at the end.
    #[must_use]
    pub fn get_at(&self, position: Position) -> Option<(&K, &V)> {
        self.tree.get_at(position).map(|(key, value)| (key, value))
    }

    /// Removes the entry at `position`. See [`FlatTree::erase`].
    ///
    /// # Panics
    ///
    /// Panics if `position` is stale or does not name an entry.
    #[track_caller]
    pub fn erase(&mut self, position: Position) -> Position {
        self.tree.erase(position)
    }

    /// Checked form of [`erase`](Self::erase).
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is stale or does not name an entry.
    pub fn try_erase(&mut self, position: Position) -> Result<Position, FlatTreeError> {
        self.tree.try_erase(position)
    }

    /// Removes the entries in `[first, last)`. See [`FlatTree::erase_range`].
    ///
    /// # Panics
    ///
    /// Panics if either position is stale or the range is malformed.
    #[track_caller]
    pub fn erase_range(&mut self, first: Position, last: Position) -> Position {
        self.tree.erase_range(first, last)
    }

    /// Checked form of [`erase_range`](Self::erase_range).
    ///
    /// # Errors
    ///
    /// Returns an error if either position is stale or the range is malformed.
    pub fn try_erase_range(
        &mut self,
        first: Position,
        last: Position,
    ) -> Result<Position, FlatTreeError> {
        self.tree.try_erase_range(first, last)
    }

    /// Keeps only the entries for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.tree.retain(|(key, value)| keep(key, value));
    }

    /// Removes every entry for which `predicate` returns `true`. Returns the
    /// number of removed entries.
    pub fn erase_if<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.tree.erase_if(|(key, value)| predicate(key, value))
    }

    /// Exchanges the contents and comparators of two maps.
    pub const fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }
}

impl<K, V, C> FlatMap<K, V, C>
where
    C: Compare<K>,
{
    /// Builds a map ordered by `compare`. The first occurrence of each key
    /// wins.
    pub fn from_iter_with_compare<I>(iter: I, compare: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            tree: FlatTree::from_iter_with_compare(iter, compare),
        }
    }

    /// Inserts `key -> value` unless `key` is present.
    ///
    /// Returns the position of the entry for `key` and whether the insertion
    /// happened. An existing value is never replaced.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        self.tree.insert((key, value))
    }

    /// Inserts `key -> value` trying `hint` first. See
    /// [`FlatTree::insert_hint`].
    pub fn insert_hint(&mut self, hint: Position, key: K, value: V) -> Position {
        self.tree.insert_hint(hint, (key, value))
    }

    /// Inserts `key -> value`, replacing the value if `key` is present.
    ///
    /// Returns the position of the entry and `true` if a new entry was
    /// created. The stored key is kept on replacement.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_flat::flat::FlatMap;
    ///
    /// let mut map = FlatMap::new();
    /// assert!(map.insert_or_assign(1, "one").1);
    /// assert!(!map.insert_or_assign(1, "uno").1);
    /// assert_eq!(map[&1], "uno");
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Position, bool) {
        match self.index_of(&key) {
            Some(index) => {
                self.tree.elements_mut()[index].1 = value;
                (self.tree.begin().advance(index), false)
            }
            None => self.tree.insert((key, value)),
        }
    }

    /// Returns the value for `key`, inserting `default()` first if absent.
    ///
    /// `default` runs only when `key` is absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let index = match self.index_of(&key) {
            Some(index) => index,
            None => self.tree.insert((key, default())).0.index(),
        };
        &mut self.tree.elements_mut()[index].1
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(key).map(|(_, value)| value)
    }

    /// Returns the stored key and value for `key`.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.get(key).map(|(key, value)| (key, value))
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.index_of(key)?;
        Some(&mut self.tree.elements_mut()[index].1)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Number of entries for `key`: 0 or 1.
    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        self.tree.count(key)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree.take(key).map(|(_, value)| value)
    }

    /// Removes `key`, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.tree.take(key)
    }

    /// Removes `key`. Returns the number of removed entries.
    pub fn erase_key(&mut self, key: &K) -> usize {
        self.tree.erase_key(key)
    }

    /// Position of the entry for `key`, or [`end`](Self::end).
    #[must_use]
    pub fn find(&self, key: &K) -> Position {
        self.tree.find(key)
    }

    /// First position whose key is not ordered before `key`.
    #[must_use]
    pub fn lower_bound(&self, key: &K) -> Position {
        self.tree.lower_bound(key)
    }

    /// First position whose key is ordered after `key`.
    #[must_use]
    pub fn upper_bound(&self, key: &K) -> Position {
        self.tree.upper_bound(key)
    }

    /// `(lower_bound(key), upper_bound(key))`.
    #[must_use]
    pub fn equal_range(&self, key: &K) -> (Position, Position) {
        self.tree.equal_range(key)
    }

    /// Inserts every entry whose key is absent, in input order.
    pub fn insert_range<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.tree.insert_range(iter);
    }

    fn index_of(&self, key: &K) -> Option<usize> {
        let index = self.tree.find(key).index();
        (index < self.len()).then_some(index)
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over `(&K, &V)` in key order.
#[derive(Clone)]
pub struct FlatMapIterator<'a, K, V> {
    inner: std::slice::Iter<'a, (K, V)>,
}

/// Iterator over `(&K, &mut V)` in key order.
pub struct FlatMapIterMut<'a, K, V> {
    inner: std::slice::IterMut<'a, (K, V)>,
}

/// Iterator over the keys of a [`FlatMap`].
#[derive(Clone)]
pub struct FlatMapKeys<'a, K, V> {
    inner: std::slice::Iter<'a, (K, V)>,
}

/// Iterator over the values of a [`FlatMap`].
#[derive(Clone)]
pub struct FlatMapValues<'a, K, V> {
    inner: std::slice::Iter<'a, (K, V)>,
}

/// Iterator over mutable values of a [`FlatMap`].
pub struct FlatMapValuesMut<'a, K, V> {
    inner: std::slice::IterMut<'a, (K, V)>,
}

/// Implements the iterator traits for an entry iterator by projecting each
/// slice item with `$project`.
macro_rules! entry_iterator {
    ($name:ident, $item:ty, $project:expr) => {
        impl<'a, K, V> Iterator for $name<'a, K, V> {
            type Item = $item;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.inner.next().map($project)
            }

            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.inner.size_hint()
            }
        }

        impl<K, V> DoubleEndedIterator for $name<'_, K, V> {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.inner.next_back().map($project)
            }
        }

        impl<K, V> ExactSizeIterator for $name<'_, K, V> {
            #[inline]
            fn len(&self) -> usize {
                self.inner.len()
            }
        }

        impl<K, V> FusedIterator for $name<'_, K, V> {}
    };
}

entry_iterator!(FlatMapIterator, (&'a K, &'a V), |(key, value)| (key, value));
entry_iterator!(FlatMapIterMut, (&'a K, &'a mut V), |(key, value)| (&*key, value));
entry_iterator!(FlatMapKeys, &'a K, |(key, _)| key);
entry_iterator!(FlatMapValues, &'a V, |(_, value)| value);
entry_iterator!(FlatMapValuesMut, &'a mut V, |(_, value)| value);

impl<K, V, C> IntoIterator for FlatMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = FlatTreeIntoIterator<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a FlatMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = FlatMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut FlatMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = FlatMapIterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, C: Default> Default for FlatMap<K, V, C> {
    fn default() -> Self {
        Self {
            tree: FlatTree::default(),
        }
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for FlatMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.tree.clone_from(&source.tree);
    }
}

impl<K, V, C> FromIterator<(K, V)> for FlatMap<K, V, C>
where
    C: Compare<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tree: iter.into_iter().collect(),
        }
    }
}

impl<K, V, C> Extend<(K, V)> for FlatMap<K, V, C>
where
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.tree.insert_range(iter);
    }
}

impl<K, V, C, const N: usize> From<[(K, V); N]> for FlatMap<K, V, C>
where
    C: Compare<K> + Default,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, V, C> Index<&K> for FlatMap<K, V, C>
where
    C: Compare<K>,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not present.
    #[track_caller]
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("FlatMap index: key not present"),
        }
    }
}

impl<K, V, C, C2> PartialEq<FlatMap<K, V, C2>> for FlatMap<K, V, C>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &FlatMap<K, V, C2>) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C> Eq for FlatMap<K, V, C> {}

impl<K, V, C, C2> PartialOrd<FlatMap<K, V, C2>> for FlatMap<K, V, C>
where
    K: PartialOrd,
    V: PartialOrd,
{
    fn partial_cmp(&self, other: &FlatMap<K, V, C2>) -> Option<std::cmp::Ordering> {
        self.tree.partial_cmp(&other.tree)
    }
}

impl<K: Ord, V: Ord, C> Ord for FlatMap<K, V, C> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.tree.cmp(&other.tree)
    }
}

impl<K: Hash, V: Hash, C> Hash for FlatMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for FlatMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

static_assertions::assert_impl_all!(FlatMap<String, i32>: Send, Sync, Clone, Default);

// =============================================================================
// Rayon Support
// =============================================================================

#[cfg(feature = "rayon")]
impl<K: Sync, V: Sync, C> FlatMap<K, V, C> {
    /// Returns a parallel iterator over the entries in key order.
    #[must_use]
    pub fn par_iter(&self) -> rayon::slice::Iter<'_, (K, V)> {
        self.tree.par_iter()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, C> serde::Serialize for FlatMap<K, V, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct FlatMapVisitor<K, V, C> {
    marker: std::marker::PhantomData<fn() -> FlatMap<K, V, C>>,
}

#[cfg(feature = "serde")]
impl<K, V, C> FlatMapVisitor<K, V, C> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::de::Visitor<'de> for FlatMapVisitor<K, V, C>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    C: Compare<K> + Default,
{
    type Value = FlatMap<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0).min(4096));
        while let Some(entry) = access.next_entry()? {
            entries.push(entry);
        }
        Ok(entries.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::Deserialize<'de> for FlatMap<K, V, C>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    C: Compare<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(FlatMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
