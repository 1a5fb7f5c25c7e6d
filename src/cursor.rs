//! A cursor that walks an [`OrderedTree`] in ascending order and can remove the element it
//! just returned without losing its place.
//!
//! # Examples
//!
//! ```
//! use bst_set::{OrderedTree, TreeError};
//!
//! let mut tree: OrderedTree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
//! let mut cursor = tree.cursor();
//!
//! // Nothing has been returned yet so there is nothing to remove.
//! assert_eq!(cursor.remove(), Err(TreeError::IllegalState));
//!
//! let mut kept = Vec::new();
//! while cursor.has_next() {
//!     let value = *cursor.next()?;
//!     if value == 5 {
//!         assert_eq!(cursor.remove(), Ok(5));
//!     } else {
//!         kept.push(value);
//!     }
//! }
//! assert_eq!(cursor.next(), Err(TreeError::Exhausted));
//!
//! assert_eq!(kept, [1, 3, 4, 7, 8, 9]);
//! assert_eq!(tree.len(), 6);
//! assert!(tree.check_invariant());
//! # Ok::<(), TreeError>(())
//! ```

use std::fmt;
use std::ptr::NonNull;

use log::trace;

use crate::compare::Natural;
use crate::error::{Result, TreeError};
use crate::iter::Traversal;
use crate::tree::{Node, OrderedTree};

/// Where a cursor stands relative to the element it last returned.
enum Position<T> {
    /// `next` hasn't been called yet.
    Fresh,
    /// The last call was `next` and it returned this node, so it may be removed.
    Positioned(NonNull<Node<T>>),
    /// The last call was `remove`. Another `next` is needed before removing again.
    Removed,
}

/// Walks the elements of an [`OrderedTree`] in ascending order and can remove the one it last
/// returned.
///
/// Created by [`OrderedTree::cursor`]. The cursor mutably borrows its tree, so the tree can't
/// change underneath it except through [`TreeCursor::remove`].
pub struct TreeCursor<'a, T, C = Natural> {
    tree: &'a mut OrderedTree<T, C>,
    /// How many of the tree's current elements have been returned.
    emitted: usize,
    position: Position<T>,
    traversal: Traversal<T>,
}

impl<T, C> fmt::Debug for TreeCursor<'_, T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("TreeCursor");
        debug.field("emitted", &self.emitted);
        match self.position {
            Position::Fresh => debug.field("position", &"fresh"),
            // SAFETY: a positioned node hasn't been removed so it is still owned by the tree.
            Position::Positioned(node) => debug.field("current", unsafe { &node.as_ref().value }),
            Position::Removed => debug.field("position", &"removed"),
        };
        debug.field("remaining", &(self.tree.len() - self.emitted)).finish()
    }
}

impl<'a, T, C> TreeCursor<'a, T, C> {
    pub(crate) fn new(tree: &'a mut OrderedTree<T, C>) -> Self {
        let traversal = Traversal::new(tree.root_link());
        Self {
            tree,
            emitted: 0,
            position: Position::Fresh,
            traversal,
        }
    }

    /// Whether [`next`][Self::next] would return another element.
    pub fn has_next(&self) -> bool {
        self.emitted < self.tree.len()
    }

    /// Returns the next element in ascending order.
    ///
    /// # Errors
    ///
    /// [`TreeError::Exhausted`] if every element has already been returned. The cursor is left
    /// as it was.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<&T> {
        if !self.has_next() {
            return Err(TreeError::Exhausted);
        }
        // SAFETY: the cursor holds the only borrow of the tree and the only structural edits
        // happen in `remove`, which never frees a node the traversal still refers to.
        let node = unsafe { self.traversal.advance() }.ok_or(TreeError::Exhausted)?;
        self.position = Position::Positioned(node);
        self.emitted += 1;
        // SAFETY: `node` is owned by the tree, which is borrowed for as long as `self` is.
        Ok(unsafe { &(*node.as_ptr()).value })
    }

    /// Removes the element most recently returned by [`next`][Self::next] and hands it back.
    /// Iteration carries on with the following element.
    ///
    /// The node is removed by relinking, so the rest of the walk is unaffected. Its right
    /// subtree is always the part still to be visited. Whether that subtree is spliced into the
    /// removed slot or adopted by the promoted predecessor, it keeps its identity, so the walk
    /// resumes from it. If there is no right subtree the walk resumes from the ancestor stack.
    /// That stack never holds the removed node or the node that fills its slot, since both
    /// were visited before it was.
    ///
    /// # Errors
    ///
    /// [`TreeError::IllegalState`] if `next` hasn't been called yet or the element it returned
    /// was already removed. Nothing is changed.
    pub fn remove(&mut self) -> Result<T> {
        let Position::Positioned(target) = self.position else {
            return Err(TreeError::IllegalState);
        };

        // SAFETY: `target` was returned by the traversal, and positioned nodes are never freed
        // before this call.
        let unlinked = unsafe { self.tree.unlink(target) };
        debug_assert!(
            unlinked.replacement.is_none() || self.traversal.top() != unlinked.replacement,
            "node filling the removed slot is queued to be visited again"
        );

        self.emitted -= 1;
        self.position = Position::Removed;
        trace!(
            "cursor removed an element after {} emitted, {} still to come",
            self.emitted,
            self.tree.len() - self.emitted
        );
        Ok(unlinked.value)
    }
}
