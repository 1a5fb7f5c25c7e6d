//! An ordered set backed by an unbalanced Binary Search Tree (BST), with a cursor that can
//! remove elements in the middle of a traversal.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree stores its elements in `Node`s. Each `Node` holds one element and
//! has up to two child `Node`s. The important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Together these mean searching takes `O(height)`, where `height` is the length of the
//! longest path from the root `Node` down to a leaf. This tree does no rebalancing, so
//! adding already-sorted elements makes it as tall as it has elements. BSTs also naturally
//! support sorted iteration by visiting the left subtree, then the subtree root, then the
//! right subtree.
//!
//! ## Removing while iterating
//!
//! [`OrderedTree::cursor`] returns a [`TreeCursor`] that walks the elements in ascending
//! order and can remove the element it last returned. Nodes are never copied into one
//! another. A node with two children is replaced by relinking its predecessor (the largest
//! node of its left subtree) into its place. The nodes the cursor still has to visit
//! therefore stay where it expects them.
//!
//! ```
//! use bst_set::OrderedTree;
//!
//! let mut tree: OrderedTree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
//!
//! let mut cursor = tree.cursor();
//! while let Ok(&value) = cursor.next() {
//!     if value % 2 == 1 {
//!         cursor.remove().unwrap();
//!     }
//! }
//!
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [4, 8]);
//! assert!(tree.check_invariant());
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod compare;
mod cursor;
mod error;
mod iter;
mod tree;

pub use compare::{Comparator, Natural};
pub use cursor::TreeCursor;
pub use error::{Result, TreeError};
pub use iter::Iter;
pub use tree::OrderedTree;
