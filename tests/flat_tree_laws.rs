//! Property-based tests for FlatTree.
//!
//! These tests verify that FlatTree keeps its ordering and uniqueness
//! invariants and agrees with a naive model under arbitrary operation
//! sequences.

use lambars_flat::flat::{CompareFn, FlatSet, FlatTree, Greater, Identity};
use proptest::prelude::*;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

fn arbitrary_values(max_size: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-50..50_i32, 0..max_size)
}

/// Pairs whose first component often collides, so stability is exercised.
fn arbitrary_pairs(max_size: usize) -> impl Strategy<Value = Vec<(i8, u16)>> {
    prop::collection::vec((-8..8_i8, any::<u16>()), 0..max_size)
}

#[derive(Debug, Clone)]
enum Operation {
    Insert(i32),
    InsertAtEnd(i32),
    InsertAtBegin(i32),
    EraseKey(i32),
    EraseFirst,
    EraseRange(usize, usize),
    Clear,
}

fn arbitrary_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (-30..30_i32).prop_map(Operation::Insert),
        2 => (-30..30_i32).prop_map(Operation::InsertAtEnd),
        2 => (-30..30_i32).prop_map(Operation::InsertAtBegin),
        3 => (-30..30_i32).prop_map(Operation::EraseKey),
        1 => Just(Operation::EraseFirst),
        1 => (0..10_usize, 0..10_usize)
            .prop_map(|(left, right)| Operation::EraseRange(left, right)),
        1 => Just(Operation::Clear),
    ]
}

fn is_strictly_ascending<T: Ord>(slice: &[T]) -> bool {
    slice.windows(2).all(|pair| pair[0] < pair[1])
}

/// Naive model: insertion keeps the first occurrence of each key.
fn first_occurrences_by_key(pairs: &[(i8, u16)]) -> Vec<(i8, u16)> {
    let mut model: Vec<(i8, u16)> = Vec::new();
    for pair in pairs {
        if model.iter().all(|existing| existing.0 != pair.0) {
            model.push(*pair);
        }
    }
    model.sort_by_key(|pair| pair.0);
    model
}

// =============================================================================
// Construction Laws
// =============================================================================

proptest! {
    /// Law: a built container is strictly sorted and holds each input key once.
    #[test]
    fn prop_construction_sorts_and_deduplicates(values in arbitrary_values(64)) {
        let tree: FlatSet<i32> = values.iter().copied().collect();
        let mut expected = values;
        expected.sort_unstable();
        expected.dedup();

        prop_assert!(is_strictly_ascending(tree.as_slice()));
        prop_assert_eq!(tree.as_slice(), expected.as_slice());
    }

    /// Law: bulk construction equals repeated insertion in input order.
    #[test]
    fn prop_construction_keeps_first_occurrence(pairs in arbitrary_pairs(64)) {
        let by_key = CompareFn(|left: &(i8, u16), right: &(i8, u16)| left.0 < right.0);
        let bulk = FlatTree::from_iter_with_parts(pairs.iter().copied(), Identity, by_key);

        let mut repeated = FlatTree::with_parts(Identity, by_key);
        for pair in &pairs {
            repeated.insert(*pair);
        }

        let expected = first_occurrences_by_key(&pairs);
        prop_assert_eq!(bulk.as_slice(), expected.as_slice());
        prop_assert_eq!(bulk, repeated);
    }

    /// Law: insert_range equals repeated insertion in input order.
    #[test]
    fn prop_insert_range_matches_repeated_insert(
        initial in arbitrary_pairs(32),
        batch in arbitrary_pairs(32)
    ) {
        let by_key = CompareFn(|left: &(i8, u16), right: &(i8, u16)| left.0 < right.0);
        let mut bulk = FlatTree::from_iter_with_parts(initial.iter().copied(), Identity, by_key);
        let mut repeated = FlatTree::from_iter_with_parts(initial, Identity, by_key);

        bulk.insert_range(batch.iter().copied());
        for pair in batch {
            repeated.insert(pair);
        }
        prop_assert_eq!(bulk, repeated);
    }
}

// =============================================================================
// Insert / Erase Laws
// =============================================================================

proptest! {
    /// Law: inserting a present key changes nothing.
    /// tree.contains(k) => tree.insert(k) == (tree.find(k), false)
    #[test]
    fn prop_insert_never_overwrites(pairs in arbitrary_pairs(32), value: u16) {
        prop_assume!(!pairs.is_empty());
        let by_key = CompareFn(|left: &(i8, u16), right: &(i8, u16)| left.0 < right.0);
        let mut tree = FlatTree::from_iter_with_parts(pairs.iter().copied(), Identity, by_key);
        let before = tree.as_slice().to_vec();
        let key = pairs[0].0;

        let expected = tree.find(&(key, 0));
        let (position, inserted) = tree.insert((key, value));

        prop_assert!(!inserted);
        prop_assert_eq!(position, expected);
        prop_assert_eq!(tree.as_slice(), before.as_slice());
    }

    /// Law: successful insert grows by one, erase_key shrinks by its result.
    #[test]
    fn prop_insert_erase_size_duality(values in arbitrary_values(32), key in -60..60_i32) {
        let mut tree: FlatSet<i32> = values.into_iter().collect();
        let length = tree.len();

        let (_, inserted) = tree.insert(key);
        prop_assert_eq!(tree.len(), length + usize::from(inserted));

        let erased = tree.erase_key(&key);
        prop_assert_eq!(erased, 1);
        prop_assert_eq!(tree.len(), length + usize::from(inserted) - erased);
        prop_assert_eq!(tree.count(&key), 0);
    }

    /// Law: insert_hint gives the same container as insert, whatever the hint.
    #[test]
    fn prop_hint_never_misplaces(
        values in arbitrary_values(32),
        key in -60..60_i32,
        offset in 0..40_usize
    ) {
        let mut hinted: FlatSet<i32> = values.iter().copied().collect();
        let mut plain: FlatSet<i32> = values.into_iter().collect();

        let hint = hinted.begin().advance(offset);
        let position = hinted.insert_hint(hint, key);
        plain.insert(key);

        prop_assert_eq!(hinted.get_at(position), Some(&key));
        prop_assert_eq!(hinted, plain);
    }

    /// Law: erase_if keeps exactly the survivors, in order.
    #[test]
    fn prop_erase_if_preserves_order(values in arbitrary_values(64), divisor in 1..5_i32) {
        let mut tree: FlatSet<i32> = values.iter().copied().collect();
        let length = tree.len();
        let expected: Vec<i32> =
            tree.iter().copied().filter(|value| value % divisor != 0).collect();
        let removed = tree.erase_if(|value| value % divisor == 0);

        prop_assert_eq!(tree.as_slice(), expected.as_slice());
        prop_assert_eq!(removed + tree.len(), length);
    }

    /// Law: a random operation sequence agrees with a sorted-Vec model.
    #[test]
    fn prop_operations_agree_with_model(
        operations in prop::collection::vec(arbitrary_operation(), 0..64)
    ) {
        let mut tree: FlatSet<i32> = FlatSet::new();
        let mut model: Vec<i32> = Vec::new();

        for operation in operations {
            match operation {
                Operation::Insert(value) => {
                    let (position, inserted) = tree.insert(value);
                    let slot = model.binary_search(&value);
                    prop_assert_eq!(inserted, slot.is_err());
                    if let Err(index) = slot {
                        model.insert(index, value);
                    }
                    prop_assert_eq!(tree.get_at(position), Some(&value));
                }
                Operation::InsertAtEnd(value) => {
                    tree.insert_hint(tree.end(), value);
                    if let Err(index) = model.binary_search(&value) {
                        model.insert(index, value);
                    }
                }
                Operation::InsertAtBegin(value) => {
                    tree.insert_hint(tree.begin(), value);
                    if let Err(index) = model.binary_search(&value) {
                        model.insert(index, value);
                    }
                }
                Operation::EraseKey(value) => {
                    let erased = tree.erase_key(&value);
                    let slot = model.binary_search(&value);
                    prop_assert_eq!(erased, usize::from(slot.is_ok()));
                    if let Ok(index) = slot {
                        model.remove(index);
                    }
                }
                Operation::EraseFirst => {
                    if !model.is_empty() {
                        tree.erase(tree.begin());
                        model.remove(0);
                    }
                }
                Operation::EraseRange(left, right) => {
                    let first = left.min(right).min(model.len());
                    let last = left.max(right).min(model.len());
                    let begin = tree.begin();
                    tree.erase_range(begin.advance(first), begin.advance(last));
                    model.drain(first..last);
                }
                Operation::Clear => {
                    tree.clear();
                    model.clear();
                }
            }
            prop_assert_eq!(tree.as_slice(), model.as_slice());
            prop_assert!(tree.len() <= tree.capacity());
        }
    }
}

// =============================================================================
// Search Laws
// =============================================================================

proptest! {
    /// Law: find, count, lower_bound and upper_bound agree with each other.
    #[test]
    fn prop_search_agreement(values in arbitrary_values(64), key in -60..60_i32) {
        let tree: FlatSet<i32> = values.into_iter().collect();
        let (lower, upper) = tree.equal_range(&key);

        prop_assert_eq!(lower, tree.lower_bound(&key));
        prop_assert_eq!(upper, tree.upper_bound(&key));
        prop_assert_eq!(tree.distance(lower, upper), Some(tree.count(&key)));

        let found = tree.find(&key);
        if tree.count(&key) == 1 {
            prop_assert_eq!(found, lower);
            prop_assert_eq!(tree.get_at(found), Some(&key));
        } else {
            prop_assert_eq!(found, tree.end());
        }

        let below = tree.as_slice().iter().filter(|value| **value < key).count();
        prop_assert_eq!(lower.index(), below);
    }

    /// Law: reversing the comparator reverses the buffer.
    #[test]
    fn prop_reversed_comparator_reverses_order(values in arbitrary_values(64)) {
        let ascending: FlatSet<i32> = values.iter().copied().collect();
        let descending: FlatSet<i32, Greater> = values.into_iter().collect();
        let reversed: Vec<i32> = ascending.iter().rev().copied().collect();

        prop_assert_eq!(descending.as_slice(), reversed.as_slice());
    }
}

// =============================================================================
// Swap and Relational Laws
// =============================================================================

proptest! {
    /// Law: swapping twice restores both containers.
    #[test]
    fn prop_swap_is_symmetric(left in arbitrary_values(32), right in arbitrary_values(32)) {
        let mut first: FlatSet<i32> = left.into_iter().collect();
        let mut second: FlatSet<i32> = right.into_iter().collect();
        let (first_before, second_before) = (first.clone(), second.clone());

        first.swap(&mut second);
        prop_assert_eq!(&first, &second_before);
        prop_assert_eq!(&second, &first_before);

        second.swap(&mut first);
        prop_assert_eq!(first, first_before);
        prop_assert_eq!(second, second_before);
    }

    /// Law: container ordering is the lexicographic ordering of the elements.
    #[test]
    fn prop_ordering_is_lexicographic(
        left in arbitrary_values(16),
        right in arbitrary_values(16)
    ) {
        let first: FlatSet<i32> = left.into_iter().collect();
        let second: FlatSet<i32> = right.into_iter().collect();

        prop_assert_eq!(first.cmp(&second), first.as_slice().cmp(second.as_slice()));
        prop_assert_eq!(first == second, first.as_slice() == second.as_slice());
    }
}
