//! Literal-list constructors.
//!
//! Both macros go through bulk construction, so duplicates follow the usual
//! rule: the first occurrence of each key is kept.

/// Builds a [`FlatSet`](crate::flat::FlatSet) ordered by `Ord`.
///
/// # Examples
///
/// ```rust
/// use lambars_flat::flat_set;
///
/// let set = flat_set![3, 1, 2, 1];
/// assert_eq!(set.as_slice(), &[1, 2, 3]);
///
/// let empty: lambars_flat::flat::FlatSet<i32> = flat_set![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! flat_set {
    () => {
        $crate::flat::FlatSet::new()
    };

    ($($element:expr),+ $(,)?) => {
        <$crate::flat::FlatSet<_> as ::core::iter::FromIterator<_>>::from_iter([$($element),+])
    };
}

/// Builds a [`FlatMap`](crate::flat::FlatMap) ordered by `Ord`.
///
/// # Examples
///
/// ```rust
/// use lambars_flat::flat_map;
///
/// let map = flat_map! {
///     "two" => 2,
///     "one" => 1,
///     "two" => 22,
/// };
/// assert_eq!(map.len(), 2);
/// assert_eq!(map[&"two"], 2);
/// ```
#[cfg(feature = "map")]
#[macro_export]
macro_rules! flat_map {
    () => {
        $crate::flat::FlatMap::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {
        <$crate::flat::FlatMap<_, _> as ::core::iter::FromIterator<_>>::from_iter(
            [$(($key, $value)),+]
        )
    };
}

#[cfg(all(test, feature = "map"))]
mod tests {
    use crate::flat::{FlatMap, FlatSet};
    use rstest::rstest;

    #[rstest]
    fn test_flat_set_sorts_and_deduplicates() {
        let set: FlatSet<i32> = flat_set![5, 3, 5, 1];
        assert_eq!(set.as_slice(), &[1, 3, 5]);
    }

    #[rstest]
    fn test_flat_set_accepts_trailing_comma() {
        let set = flat_set!["b", "a",];
        assert_eq!(set.as_slice(), &["a", "b"]);
    }

    #[rstest]
    fn test_flat_map_keeps_first_value() {
        let map: FlatMap<i32, char> = flat_map! { 2 => 'b', 1 => 'a', 2 => 'z' };
        assert_eq!(map.into_vec(), vec![(1, 'a'), (2, 'b')]);
    }

    #[rstest]
    fn test_empty_macros_do_not_allocate() {
        let set: FlatSet<u8> = flat_set![];
        let map: FlatMap<u8, u8> = flat_map! {};
        assert_eq!(set.capacity(), 0);
        assert_eq!(map.capacity(), 0);
    }
}
