//! An unbalanced BST with parent back-links. Nodes are heap allocated and linked by raw
//! pointers so that a [`TreeCursor`] can keep hold of a node while the tree is being relinked
//! around it.
//!
//! # Examples
//!
//! ```
//! use bst_set::OrderedTree;
//!
//! let mut tree = OrderedTree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//!
//! assert!(tree.add(1));
//! assert!(tree.contains(&1));
//!
//! // Adding the same element again leaves the tree alone.
//! assert!(!tree.add(1));
//! assert_eq!(tree.len(), 1);
//!
//! // Removing reports whether the element was there.
//! assert!(tree.remove(&1));
//! assert!(!tree.remove(&1));
//! assert!(tree.is_empty());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use log::{debug, trace};

use crate::compare::{Comparator, Natural};
use crate::cursor::TreeCursor;
use crate::error::{Result, TreeError};
use crate::iter::Iter;

/// An ordered set of distinct elements stored in an unbalanced Binary Search Tree.
///
/// The order comes from a [`Comparator`], which is [`Natural`] (the element's [`Ord`]) unless
/// the tree was built with [`OrderedTree::with_comparator`].
pub struct OrderedTree<T, C = Natural> {
    // This is a `Link` instead of an `Option<Box<Node>>` so that nodes never move when the tree
    // does and the children's parent pointers stay valid.
    root: Link<T>,
    len: usize,
    cmp: C,
    marker: PhantomData<Box<Node<T>>>,
}

impl<T> OrderedTree<T>
where
    T: Ord,
{
    /// Generate a new, empty `OrderedTree` ordered by `T`'s [`Ord`] implementation.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T> Default for OrderedTree<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Drop for OrderedTree<T, C> {
    fn drop(&mut self) {
        self.free_nodes();
    }
}

impl<T, C> Clone for OrderedTree<T, C>
where
    T: Clone,
    C: Comparator<T> + Clone,
{
    /// Clones the tree node by node. Parents are added before their children so the clone has
    /// exactly the same shape.
    fn clone(&self) -> Self {
        let mut tree = Self::with_comparator(self.cmp.clone());
        let mut stack: Vec<&Node<T>> = self.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            tree.add(node.value.clone());
            stack.extend(node.right());
            stack.extend(node.left());
        }
        tree
    }
}

impl<T, C> fmt::Debug for OrderedTree<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C, D> PartialEq<OrderedTree<T, D>> for OrderedTree<T, C>
where
    T: PartialEq,
{
    fn eq(&self, other: &OrderedTree<T, D>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T, C> Eq for OrderedTree<T, C> where T: Eq {}

impl<T> FromIterator<T> for OrderedTree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C> Extend<T> for OrderedTree<T, C>
where
    C: Comparator<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a OrderedTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> OrderedTree<T, C> {
    /// Generate a new, empty `OrderedTree` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::OrderedTree;
    ///
    /// let mut tree = OrderedTree::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// assert!(tree.add("three"));
    /// assert!(tree.add("a"));
    ///
    /// // Same length means same element as far as this tree is concerned.
    /// assert!(!tree.add("seven"));
    /// assert_eq!(tree.minimum(), Ok(&"a"));
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            root: Link(None),
            len: 0,
            cmp,
            marker: PhantomData,
        }
    }

    /// The comparator this tree orders its elements by.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// The number of elements in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.free_nodes();
    }

    /// Returns the smallest element.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyCollection`] if the tree has no elements.
    pub fn minimum(&self) -> Result<&T> {
        let mut node = self.root().ok_or(TreeError::EmptyCollection)?;
        while let Some(left) = node.left() {
            node = left;
        }
        Ok(&node.value)
    }

    /// Returns the largest element.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyCollection`] if the tree has no elements.
    pub fn maximum(&self) -> Result<&T> {
        let mut node = self.root().ok_or(TreeError::EmptyCollection)?;
        while let Some(right) = node.right() {
            node = right;
        }
        Ok(&node.value)
    }

    /// The number of nodes on the longest path from the root down to a leaf. An empty tree has
    /// height 0 and a single node has height 1.
    ///
    /// This walks the whole tree so it's meant for diagnostics and tests.
    pub fn height(&self) -> usize {
        let mut tallest = 0;
        let mut stack: Vec<(&Node<T>, usize)> =
            self.root().map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            tallest = tallest.max(depth);
            stack.extend(node.left().map(|left| (left, depth + 1)));
            stack.extend(node.right().map(|right| (right, depth + 1)));
        }
        tallest
    }

    /// Iterates over the elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::OrderedTree;
    ///
    /// let tree: OrderedTree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
    /// let ascending: Vec<_> = tree.iter().copied().collect();
    ///
    /// assert_eq!(ascending, [1, 3, 4, 5, 7, 8, 9]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root, self.len)
    }

    /// Returns a cursor over the elements in ascending order which can also remove the element
    /// it last returned. See [`TreeCursor`].
    pub fn cursor(&mut self) -> TreeCursor<'_, T, C> {
        TreeCursor::new(self)
    }

    /// Keeps only the elements for which `keep` returns `true`, visiting them in ascending
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::OrderedTree;
    ///
    /// let mut tree: OrderedTree<_> = (1..=10).collect();
    /// tree.retain(|x| x % 3 == 0);
    ///
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 6, 9]);
    /// ```
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut cursor = self.cursor();
        while let Ok(value) = cursor.next() {
            if !keep(value) {
                let removed = cursor.remove();
                debug_assert!(removed.is_ok(), "cursor was just positioned");
            }
        }
    }

    /// Whether the tree contains an element equal to `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        C: Comparator<T>,
    {
        matches!(self.search(value), Search::Found(_))
    }

    /// Adds `value` to the tree. Returns `true` if it was added and `false` if an equal element
    /// was already present, in which case the tree is left untouched and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    ///
    /// assert!(tree.add(2));
    /// assert!(tree.add(1));
    /// assert!(!tree.add(2));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn add(&mut self, value: T) -> bool
    where
        C: Comparator<T>,
    {
        let parent = match self.search(&value) {
            Search::Found(_) => return false,
            Search::Vacant(parent) => parent,
        };

        let mut node = Node::new_boxed(value);
        match parent {
            None => self.root = Link::from_box(node),
            Some((mut parent, side)) => {
                node.parent = Link(Some(parent));
                // SAFETY: `search` only hands out nodes owned by this tree and we hold `&mut self`
                // so nothing else is looking at `parent`.
                let parent = unsafe { parent.as_mut() };
                match side {
                    Ordering::Less => parent.left = Link::from_box(node),
                    _ => parent.right = Link::from_box(node),
                }
            }
        }
        self.len += 1;
        true
    }

    /// Removes the element equal to `value`. Returns `true` if there was one.
    ///
    /// Removal never makes the tree taller.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::OrderedTree;
    ///
    /// let mut tree: OrderedTree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
    ///
    /// assert!(tree.remove(&5));
    /// assert!(!tree.remove(&5));
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
    /// assert!(tree.check_invariant());
    /// ```
    pub fn remove(&mut self, value: &T) -> bool
    where
        C: Comparator<T>,
    {
        self.take(value).is_some()
    }

    /// Removes the element equal to `value` and hands it back, or returns `None` if there was
    /// none.
    pub fn take(&mut self, value: &T) -> Option<T>
    where
        C: Comparator<T>,
    {
        match self.search(value) {
            // SAFETY: `search` only returns nodes owned by this tree.
            Search::Found(node) => Some(unsafe { self.unlink(node) }.value),
            Search::Vacant(_) => None,
        }
    }

    /// Verifies the structure of the whole tree:
    ///
    /// 1. Every element is strictly greater than everything in its left subtree and strictly
    ///    less than everything in its right subtree (which also means no duplicates).
    /// 2. Every child's parent link points back at the node owning it.
    /// 3. [`len`][Self::len] matches the number of nodes.
    ///
    /// This is meant for tests. The first problem found is logged at `debug` level.
    pub fn check_invariant(&self) -> bool
    where
        C: Comparator<T>,
    {
        let Some(root) = self.root.0 else {
            if self.len != 0 {
                debug!("empty tree claims {} elements", self.len);
                return false;
            }
            return true;
        };
        // SAFETY: the root is owned by this tree and `&self` rules out concurrent mutation.
        if unsafe { root.as_ref() }.parent.0.is_some() {
            debug!("root has a parent link");
            return false;
        }

        let mut count = 0;
        // Each entry carries the exclusive bounds inherited from its ancestors.
        let mut stack: Vec<(NonNull<Node<T>>, Option<&T>, Option<&T>)> = vec![(root, None, None)];
        while let Some((ptr, lower, upper)) = stack.pop() {
            // SAFETY: every pointer pushed here was read from a link of a node owned by this
            // tree.
            let node = unsafe { ptr.as_ref() };
            count += 1;

            if lower.is_some_and(|lower| self.cmp.compare(lower, &node.value) != Ordering::Less) {
                debug!("element in a right subtree is not greater than its ancestor");
                return false;
            }
            if upper.is_some_and(|upper| self.cmp.compare(&node.value, upper) != Ordering::Less) {
                debug!("element in a left subtree is not less than its ancestor");
                return false;
            }

            let children = [
                (node.left, lower, Some(&node.value)),
                (node.right, Some(&node.value), upper),
            ];
            for (child, lower, upper) in children {
                let Some(child) = child.0 else {
                    continue;
                };
                // SAFETY: as above.
                if unsafe { child.as_ref() }.parent.0 != Some(ptr) {
                    debug!("child's parent link does not point at its owner");
                    return false;
                }
                stack.push((child, lower, upper));
            }
        }

        if count != self.len {
            debug!("tree claims {} elements but holds {}", self.len, count);
            return false;
        }
        true
    }

    /// A copy of the root link, for traversals that start at the top.
    pub(crate) fn root_link(&self) -> Link<T> {
        self.root
    }

    /// Detaches `target` from the tree, moves a neighbouring node into its slot, frees it and
    /// hands back its value.
    ///
    /// Nodes are relinked rather than having values copied between them, so any pointer to a
    /// node other than `target` still refers to the same element afterwards:
    ///
    /// 1. No children: the slot holding `target` is cleared.
    /// 2. One child: the child is spliced into the slot.
    /// 3. Two children: the largest node of the left subtree (the predecessor) is promoted into
    ///    the slot. If it wasn't the left child itself, its own left child first takes its old
    ///    place and it adopts `target`'s left subtree. It always adopts `target`'s right subtree.
    ///
    /// None of these make the tree taller.
    ///
    /// # Safety
    ///
    /// `target` must be a node owned by this tree. It is freed by this call so it must not be
    /// used afterwards.
    pub(crate) unsafe fn unlink(&mut self, target: NonNull<Node<T>>) -> Unlinked<T> {
        // SAFETY: the caller guarantees `target` is live and owned by us, and every other
        // pointer used below was read from a link inside this tree. We only go through raw
        // pointers so no reference outlives the relinking.
        unsafe {
            let target = target.as_ptr();
            let parent = (*target).parent.take();
            let left = (*target).left.take();
            let right = (*target).right.take();

            let replacement = match (left.0, right.0) {
                (None, None) => {
                    trace!("removing leaf node");
                    None
                }
                (Some(child), None) | (None, Some(child)) => {
                    trace!("splicing only child into removed slot");
                    Some(child)
                }
                (Some(left), Some(right)) => {
                    let promoted = Node::rightmost(left);
                    if promoted != left {
                        // `promoted` was reached by going right so it is its parent's right
                        // child, and it has no right child of its own.
                        let old_parent = (*promoted.as_ptr()).parent;
                        let orphan = (*promoted.as_ptr()).left;
                        if let Some(old_parent) = old_parent.0 {
                            (*old_parent.as_ptr()).right = orphan;
                        }
                        if let Some(orphan) = orphan.0 {
                            (*orphan.as_ptr()).parent = old_parent;
                        }

                        (*promoted.as_ptr()).left = Link(Some(left));
                        (*left.as_ptr()).parent = Link(Some(promoted));
                    }
                    (*promoted.as_ptr()).right = Link(Some(right));
                    (*right.as_ptr()).parent = Link(Some(promoted));
                    trace!("promoting predecessor into removed slot");
                    Some(promoted)
                }
            };

            self.replace_child(parent, NonNull::new_unchecked(target), Link(replacement));
            self.len -= 1;

            let node = *Box::from_raw(target);
            Unlinked {
                value: node.value,
                replacement,
            }
        }
    }

    /// Points whichever of `parent`'s links held `old` (or the root, if there's no parent) at
    /// `new`, and points `new` back at `parent`.
    ///
    /// # Safety
    ///
    /// `parent` must be empty or a node owned by this tree, and `new` must be empty or a node
    /// owned by this tree.
    unsafe fn replace_child(&mut self, parent: Link<T>, old: NonNull<Node<T>>, new: Link<T>) {
        // SAFETY: see the function's safety section.
        unsafe {
            match parent.0 {
                None => self.root = new,
                Some(parent) => {
                    let parent = parent.as_ptr();
                    // Identity decides which side, not the comparator.
                    if (*parent).left.0 == Some(old) {
                        (*parent).left = new;
                    } else {
                        (*parent).right = new;
                    }
                }
            }
            if let Some(new) = new.0 {
                (*new.as_ptr()).parent = parent;
            }
        }
    }

    /// Binary-search descent from the root.
    fn search(&self, value: &T) -> Search<T>
    where
        C: Comparator<T>,
    {
        let mut parent = None;
        let mut link = self.root;
        while let Some(ptr) = link.0 {
            // SAFETY: `ptr` was read from a link of this tree and `&self` rules out mutation.
            let node = unsafe { ptr.as_ref() };
            let side = self.cmp.compare(value, &node.value);
            link = match side {
                Ordering::Equal => return Search::Found(ptr),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            parent = Some((ptr, side));
        }
        Search::Vacant(parent)
    }

    fn root(&self) -> Option<&Node<T>> {
        self.root.node()
    }

    /// Frees every node without recursing so degenerate (list shaped) trees can't overflow the
    /// stack.
    fn free_nodes(&mut self) {
        let mut stack: Vec<NonNull<Node<T>>> = self.root.take().0.into_iter().collect();
        while let Some(ptr) = stack.pop() {
            // SAFETY: each node is owned by exactly one link and we've taken the root, so every
            // node is reached (and freed) once. They were allocated with `Box::new` in
            // `Node::new_boxed`.
            let node = unsafe { Box::from_raw(ptr.as_ptr()) };
            stack.extend(node.left.0);
            stack.extend(node.right.0);
        }
        self.len = 0;
    }
}

/// Where a [`OrderedTree::search`] descent ended.
enum Search<T> {
    /// A node holding an equal element.
    Found(NonNull<Node<T>>),
    /// No equal element. The value belongs under this node on the given side, or at the root if
    /// the tree is empty.
    Vacant(Option<(NonNull<Node<T>>, Ordering)>),
}

/// What [`OrderedTree::unlink`] leaves behind.
pub(crate) struct Unlinked<T> {
    /// The removed element.
    pub(crate) value: T,
    /// The node now sitting in the removed node's slot, if any.
    pub(crate) replacement: Option<NonNull<Node<T>>>,
}

pub(crate) struct Link<T>(pub(crate) Option<NonNull<Node<T>>>);

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Link<T> {}

impl<T> Link<T> {
    fn from_box(node: Box<Node<T>>) -> Self {
        Link(Some(NonNull::from(Box::leak(node))))
    }

    pub(crate) fn node(&self) -> Option<&Node<T>> {
        // SAFETY: a non-empty link always points at a live node owned by some tree. Handing out a
        // shared reference is fine as long as nobody is mutating the tree, which every caller
        // guarantees by holding at least `&` of the tree.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    pub(crate) fn take(&mut self) -> Self {
        Link(self.0.take())
    }
}

pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    /// Non-owning.
    pub(crate) parent: Link<T>,
}

impl<T> Node<T> {
    fn new_boxed(value: T) -> Box<Self> {
        Box::new(Node {
            value,
            left: Link(None),
            right: Link(None),
            parent: Link(None),
        })
    }

    pub(crate) fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    pub(crate) fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    /// The largest node in the subtree rooted at `node`.
    ///
    /// # Safety
    ///
    /// `node` must be a live node.
    unsafe fn rightmost(mut node: NonNull<Self>) -> NonNull<Self> {
        // SAFETY: the caller guarantees `node` is live and links only point at live nodes.
        while let Some(right) = unsafe { (*node.as_ptr()).right.0 } {
            node = right;
        }
        node
    }
}
