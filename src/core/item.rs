use std::fmt::Debug;
use std::hash::Hash;

/// An item that can take part in list reconciliation.
///
/// Implementors supply two things:
/// - a stable identity key that says "this is the same row" across the old
///   and new sequences
/// - a content comparison between two items sharing that key, which decides
///   whether the row needs to be re-rendered
///
/// There is no blanket implementation. A type's memory address or hash is
/// not its logical identity, so every row type states its key explicitly.
pub trait Diffable {
    /// Identity key type
    type Key: Eq + Hash + Clone + Debug;

    /// Identity key of this item
    fn diff_key(&self) -> Self::Key;

    /// Whether `other` (which shares this item's key) displays the same content
    fn content_eq(&self, other: &Self) -> bool;
}

impl<T: Diffable + ?Sized> Diffable for &T {
    type Key = T::Key;

    fn diff_key(&self) -> Self::Key {
        (**self).diff_key()
    }

    fn content_eq(&self, other: &Self) -> bool {
        (**self).content_eq(*other)
    }
}
