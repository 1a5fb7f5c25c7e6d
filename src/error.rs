//! Failures surfaced by [`OrderedTree`][crate::OrderedTree] and
//! [`TreeCursor`][crate::TreeCursor].
//!
//! Absence and presence of elements are normal outcomes reported through `bool`s, so the only
//! errors are caller-contract violations and running out of elements.

/// Everything that can go wrong when talking to the tree or one of its cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// [`TreeCursor::next`][crate::TreeCursor::next] was called after every element had
    /// already been returned.
    #[error("cursor has no more elements")]
    Exhausted,
    /// [`TreeCursor::remove`][crate::TreeCursor::remove] was called before any `next`, or
    /// twice without a `next` in between.
    #[error("cursor is not positioned on an element")]
    IllegalState,
    /// The minimum or maximum of an empty tree was requested.
    #[error("tree is empty")]
    EmptyCollection,
}

/// Shorthand used across the crate.
pub type Result<T, E = TreeError> = std::result::Result<T, E>;
