//! Ascending, non-recursive traversal of an [`OrderedTree`][crate::OrderedTree].

use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::tree::{Link, Node};

/// Suspendable in-order walk. It is the state shared by [`Iter`] and
/// [`TreeCursor`][crate::TreeCursor].
///
/// Instead of recursing, the walk keeps:
///
/// * `pending`: the subtree whose minimum is the next element, if it is still unvisited.
/// * `ancestors`: nodes passed on the way down to a minimum. Each is still to be returned and
///   its right subtree is still to be visited. The most recently passed one is on top.
///
/// When `pending` is empty the next element is the top ancestor.
pub(crate) struct Traversal<T> {
    pending: Link<T>,
    ancestors: Vec<NonNull<Node<T>>>,
}

impl<T> Traversal<T> {
    /// A walk over the whole tree under `root`.
    pub(crate) fn new(root: Link<T>) -> Self {
        Self {
            pending: root,
            ancestors: Vec::new(),
        }
    }

    /// Steps to the next node in ascending order. The node's right subtree becomes the new
    /// `pending`.
    ///
    /// # Safety
    ///
    /// Every node reachable from `pending` and every node on the ancestor stack must still be
    /// alive and linked into the same tree.
    pub(crate) unsafe fn advance(&mut self) -> Option<NonNull<Node<T>>> {
        let next = match self.pending.take().0 {
            // SAFETY: the caller guarantees the pending subtree is live.
            Some(subtree) => unsafe { self.descend_left(subtree) },
            None => self.ancestors.pop()?,
        };
        // SAFETY: `next` came from the pending subtree or the stack, both live.
        self.pending = unsafe { next.as_ref() }.right;
        Some(next)
    }

    /// The ancestor that would be returned once `pending` is used up.
    pub(crate) fn top(&self) -> Option<NonNull<Node<T>>> {
        self.ancestors.last().copied()
    }

    /// Walks left from `node` as far as possible, pushing every node passed on the way.
    ///
    /// # Safety
    ///
    /// `node` must be live.
    unsafe fn descend_left(&mut self, mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
        // SAFETY: the caller guarantees `node` is live and links only point at live nodes.
        while let Some(left) = unsafe { node.as_ref() }.left.0 {
            self.ancestors.push(node);
            node = left;
        }
        node
    }
}

/// An iterator over the elements of an [`OrderedTree`][crate::OrderedTree] in ascending
/// order.
///
/// Created by [`OrderedTree::iter`][crate::OrderedTree::iter]. Every step takes amortised
/// `O(1)` time and the iterator holds at most `O(height)` extra pointers.
pub struct Iter<'a, T> {
    traversal: Traversal<T>,
    remaining: usize,
    marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: Link<T>, len: usize) -> Self {
        Self {
            traversal: Traversal::new(root),
            remaining: len,
            marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: the tree is shared-borrowed for `'a` so no node is freed or relinked while
        // this iterator exists.
        let node = unsafe { self.traversal.advance() }?;
        self.remaining -= 1;
        // SAFETY: as above, the node outlives `'a`.
        Some(unsafe { &(*node.as_ptr()).value })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
