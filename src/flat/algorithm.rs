//! Sorted set algebra and free-function algorithms over [`FlatTree`].
//!
//! The set operations walk both buffers once with two cursors and build the
//! result already in order, so no re-sort is needed. Both operands must share
//! the same ordering; the left operand's extractor and comparator are used
//! throughout and cloned into the result.
//!
//! # Examples
//!
//! ```rust
//! use lambars_flat::flat::{self, FlatSet};
//!
//! let left: FlatSet<i32> = [1, 2, 3, 4].into_iter().collect();
//! let right: FlatSet<i32> = [3, 4, 5].into_iter().collect();
//!
//! assert_eq!(flat::union(&left, &right).as_slice(), &[1, 2, 3, 4, 5]);
//! assert_eq!(flat::intersection(&left, &right).as_slice(), &[3, 4]);
//! assert_eq!(flat::difference(&left, &right).as_slice(), &[1, 2]);
//! ```

use std::cmp::Ordering;

use super::compare::Compare;
use super::key::KeyOf;
use super::tree::FlatTree;

/// Which side of a two-cursor walk to keep at each step.
#[derive(Clone, Copy)]
struct Keep {
    left_only: bool,
    right_only: bool,
    both: bool,
}

/// Two-cursor merge of two strictly sorted slices.
///
/// On equivalent keys the left element is the one kept.
fn merge_by<T, E, C>(left: &[T], right: &[T], extractor: &E, compare: &C, keep: Keep) -> Vec<T>
where
    T: Clone,
    E: KeyOf<T>,
    C: Compare<E::Key>,
{
    let mut result = Vec::with_capacity(match (keep.left_only, keep.right_only) {
        (true, true) => left.len() + right.len(),
        (true, false) => left.len(),
        _ => left.len().min(right.len()),
    });
    let mut left_index = 0;
    let mut right_index = 0;

    while left_index < left.len() && right_index < right.len() {
        let ordering = compare.ordering(
            extractor.key_of(&left[left_index]),
            extractor.key_of(&right[right_index]),
        );
        match ordering {
            Ordering::Less => {
                if keep.left_only {
                    result.push(left[left_index].clone());
                }
                left_index += 1;
            }
            Ordering::Greater => {
                if keep.right_only {
                    result.push(right[right_index].clone());
                }
                right_index += 1;
            }
            Ordering::Equal => {
                if keep.both {
                    result.push(left[left_index].clone());
                }
                left_index += 1;
                right_index += 1;
            }
        }
    }

    if keep.left_only {
        result.extend_from_slice(&left[left_index..]);
    }
    if keep.right_only {
        result.extend_from_slice(&right[right_index..]);
    }
    result
}

fn combine<T, E, C>(
    left: &FlatTree<T, E, C>,
    right: &FlatTree<T, E, C>,
    keep: Keep,
) -> FlatTree<T, E, C>
where
    T: Clone,
    E: KeyOf<T> + Clone,
    C: Compare<E::Key> + Clone,
{
    let extractor = left.key_extractor();
    let compare = left.key_comp();
    let elements = merge_by(
        left.as_slice(),
        right.as_slice(),
        extractor,
        compare,
        keep,
    );
    FlatTree::from_sorted_vec(elements, extractor.clone(), compare.clone())
}

/// Elements present in either container.
///
/// For keys present in both, the element from `left` is kept.
///
/// # Complexity
///
/// O(n + m)
#[must_use]
pub fn union<T, E, C>(left: &FlatTree<T, E, C>, right: &FlatTree<T, E, C>) -> FlatTree<T, E, C>
where
    T: Clone,
    E: KeyOf<T> + Clone,
    C: Compare<E::Key> + Clone,
{
    combine(
        left,
        right,
        Keep {
            left_only: true,
            right_only: true,
            both: true,
        },
    )
}

/// Elements of `left` whose key is also present in `right`.
///
/// # Complexity
///
/// O(n + m)
#[must_use]
pub fn intersection<T, E, C>(
    left: &FlatTree<T, E, C>,
    right: &FlatTree<T, E, C>,
) -> FlatTree<T, E, C>
where
    T: Clone,
    E: KeyOf<T> + Clone,
    C: Compare<E::Key> + Clone,
{
    combine(
        left,
        right,
        Keep {
            left_only: false,
            right_only: false,
            both: true,
        },
    )
}

/// Elements of `left` whose key is absent from `right`.
///
/// # Complexity
///
/// O(n + m)
#[must_use]
pub fn difference<T, E, C>(
    left: &FlatTree<T, E, C>,
    right: &FlatTree<T, E, C>,
) -> FlatTree<T, E, C>
where
    T: Clone,
    E: KeyOf<T> + Clone,
    C: Compare<E::Key> + Clone,
{
    combine(
        left,
        right,
        Keep {
            left_only: true,
            right_only: false,
            both: false,
        },
    )
}

/// Removes every element of `tree` matching `predicate`.
///
/// Free-function form of [`FlatTree::erase_if`]. Returns the number of
/// removed elements.
///
/// # Examples
///
/// ```rust
/// use lambars_flat::flat::{self, FlatSet};
///
/// let mut set: FlatSet<i32> = [1, 2, 3, 4].into_iter().collect();
/// assert_eq!(flat::erase_if(&mut set, |value| value % 2 == 1), 2);
/// assert_eq!(set.as_slice(), &[2, 4]);
/// ```
pub fn erase_if<T, E, C, F>(tree: &mut FlatTree<T, E, C>, predicate: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    tree.erase_if(predicate)
}
