use bst_set::{OrderedTree, TreeError};
use quickcheck_macros::quickcheck;

use std::collections::{BTreeSet, HashSet};

use crate::Op;

/// Applies a set of operations to a tree and a `BTreeSet`.
/// This way we can ensure that after a random smattering of adds,
/// removes and cursor sweeps we have the same elements in both.
fn do_ops(ops: &[Op<i8>], tree: &mut OrderedTree<i8>, model: &mut BTreeSet<i8>) {
    for op in ops {
        match op {
            Op::Add(x) => {
                assert_eq!(tree.add(*x), model.insert(*x));
            }
            Op::Remove(x) => {
                let height = tree.height();
                assert_eq!(tree.remove(x), model.remove(x));
                assert!(tree.height() <= height);
            }
            Op::Sweep(every) => {
                let every = i16::from(*every % 7) + 2;
                let mut cursor = tree.cursor();
                while let Ok(&x) = cursor.next() {
                    if i16::from(x) % every == 0 {
                        assert_eq!(cursor.remove(), Ok(x));
                        model.remove(&x);
                    }
                }
                assert_eq!(cursor.next(), Err(TreeError::Exhausted));
            }
        }
        assert!(tree.check_invariant());
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = OrderedTree::new();
    let mut model = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut model);
    tree.len() == model.len() && tree.iter().eq(model.iter())
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = OrderedTree::new();
    for x in &xs {
        tree.add(*x);
    }

    xs.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.contains(x))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree: OrderedTree<_> = xs.iter().copied().collect();
    for delete in &deletes {
        tree.remove(delete);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have added the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }
    let distinct: HashSet<_> = still_present.iter().collect();

    deletes.iter().all(|x| !tree.contains(x))
        && still_present.iter().all(|x| tree.contains(x))
        && tree.len() == distinct.len()
}

#[quickcheck]
fn min_and_max(xs: Vec<i8>) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();

    match (xs.iter().min(), xs.iter().max()) {
        (Some(min), Some(max)) => tree.minimum() == Ok(min) && tree.maximum() == Ok(max),
        _ => {
            tree.minimum() == Err(TreeError::EmptyCollection)
                && tree.maximum() == Err(TreeError::EmptyCollection)
        }
    }
}

#[quickcheck]
fn retain_matches_filter(xs: Vec<i8>, modulus: u8) -> bool {
    let modulus = i16::from(modulus % 5) + 1;
    let mut tree: OrderedTree<_> = xs.iter().copied().collect();
    tree.retain(|x| i16::from(*x) % modulus == 0);

    let expected: BTreeSet<_> = xs.into_iter().filter(|x| i16::from(*x) % modulus == 0).collect();
    tree.check_invariant() && tree.iter().eq(expected.iter())
}

#[quickcheck]
fn clone_is_independent(xs: Vec<i8>, victim: i8) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();
    let mut copy = tree.clone();
    copy.remove(&victim);

    copy.check_invariant()
        && tree.height() >= copy.height()
        && tree.contains(&victim) == xs.contains(&victim)
        && !copy.contains(&victim)
}

#[test]
fn cursor_remove_example() {
    let mut tree: OrderedTree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
    let mut seen = Vec::new();

    let mut cursor = tree.cursor();
    for _ in 0..4 {
        seen.push(*cursor.next().unwrap());
    }
    assert_eq!(cursor.remove(), Ok(5));
    while cursor.has_next() {
        seen.push(*cursor.next().unwrap());
    }

    assert_eq!(seen, [1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(tree.len(), 6);
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
}
