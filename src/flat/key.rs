//! Key extraction.
//!
//! The ordering of a flat container is defined over a *key* borrowed out of
//! each element. Sets order by the element itself ([`Identity`]); maps store
//! `(K, V)` pairs and order by the first component ([`First`]).

/// Projects the ordering key out of an element.
///
/// The key is borrowed from the element, so extraction never allocates and
/// never requires `Clone`.
///
/// # Examples
///
/// ```rust
/// use lambars_flat::flat::{First, Identity, KeyOf};
///
/// assert_eq!(Identity.key_of(&7), &7);
/// assert_eq!(First.key_of(&("key", 1)), &"key");
/// ```
pub trait KeyOf<T> {
    /// The type elements are ordered by.
    type Key: ?Sized;

    /// Returns the key of `value`.
    fn key_of<'a>(&self, value: &'a T) -> &'a Self::Key;
}

/// The element is its own key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Identity;

impl<T> KeyOf<T> for Identity {
    type Key = T;

    #[inline]
    fn key_of<'a>(&self, value: &'a T) -> &'a T {
        value
    }
}

/// The key is the first component of a pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct First;

impl<K, V> KeyOf<(K, V)> for First {
    type Key = K;

    #[inline]
    fn key_of<'a>(&self, value: &'a (K, V)) -> &'a K {
        &value.0
    }
}
