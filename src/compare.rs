//! The total order a tree sorts its elements by.

use std::cmp::Ordering;

/// A three-way comparison over `T`. It must be a total order: consistent, antisymmetric and
/// transitive. A comparator that breaks this will not cause memory unsafety but the tree's
/// answers become meaningless.
///
/// Any `Fn(&T, &T) -> Ordering` is a comparator, which makes one-off orders easy:
///
/// ```
/// use bst_set::OrderedTree;
///
/// let mut tree = OrderedTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// tree.extend([1, 3, 2]);
///
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Compares `a` against `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders elements by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<T> Comparator<T> for Natural
where
    T: Ord + ?Sized,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Comparator<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
